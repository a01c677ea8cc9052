//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::validation::{validate_description, validate_name};
use crate::domain::{Amount, EntryType, PeriodMonth, ValidationError};
use crate::error::{AppError, AppResult};
use crate::handlers::{AuthResult, LoginCommand, LoginHandler, RegisterCommand, RegisterHandler};
use crate::repository::{
    Budget, BudgetFields, BudgetFilter, Category, CategoryFields, MonthSummary, Transaction,
    TransactionFields, TransactionFilter, User,
};

use super::extract::{AppJson, AppPath, AppQuery};
use super::middleware::AuthUser;
use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryType,
}

impl CategoryRequest {
    pub fn into_fields(self) -> Result<CategoryFields, ValidationError> {
        Ok(CategoryFields {
            name: validate_name(&self.name)?,
            kind: self.kind,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct TransactionRequest {
    #[serde(default)]
    pub category_id: Option<i64>,
    pub amount: Amount,
    #[serde(rename = "type")]
    pub kind: EntryType,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
}

impl TransactionRequest {
    pub fn into_fields(self) -> Result<TransactionFields, ValidationError> {
        Ok(TransactionFields {
            category_id: self.category_id,
            amount: self.amount,
            kind: self.kind,
            date: self.date,
            description: validate_description(self.description)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
    #[serde(default, rename = "type")]
    pub kind: Option<EntryType>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

impl TransactionQuery {
    pub fn into_filter(self) -> Result<TransactionFilter, ValidationError> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(ValidationError::InvalidDateRange);
            }
        }

        Ok(TransactionFilter {
            from: self.from,
            to: self.to,
            kind: self.kind,
            category_id: self.category_id,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct BudgetRequest {
    #[serde(default)]
    pub category_id: Option<i64>,
    pub period_month: PeriodMonth,
    pub limit_amount: Amount,
}

impl From<BudgetRequest> for BudgetFields {
    fn from(request: BudgetRequest) -> Self {
        BudgetFields {
            category_id: request.category_id,
            period_month: request.period_month,
            limit_amount: request.limit_amount,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BudgetQuery {
    #[serde(default)]
    pub month: Option<PeriodMonth>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// `month` stays a raw string so an absent value and a malformed one can be
/// reported differently.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    #[serde(default)]
    pub month: Option<String>,
}

impl SummaryQuery {
    pub fn month(self) -> AppResult<PeriodMonth> {
        match self.month.as_deref().map(str::trim) {
            None | Some("") => Err(AppError::MonthRequired),
            Some(month) => Ok(month.parse()?),
        }
    }
}

// =========================================================================
// API Router
// =========================================================================

/// Routes reachable without a token
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Routes that require an authenticated principal
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route(
            "/transactions/:id",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
        .route("/budgets", get(list_budgets).post(create_budget))
        .route(
            "/budgets/:id",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
        .route("/dashboard/summary", get(dashboard_summary))
}

// =========================================================================
// Public endpoints
// =========================================================================

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// POST /register
async fn register(
    State(state): State<AppState>,
    AppJson(command): AppJson<RegisterCommand>,
) -> AppResult<(StatusCode, Json<AuthResult>)> {
    let result = RegisterHandler::new(&state).execute(command).await?;

    Ok((StatusCode::CREATED, Json(result)))
}

/// POST /login
async fn login(
    State(state): State<AppState>,
    AppJson(command): AppJson<LoginCommand>,
) -> AppResult<Json<AuthResult>> {
    let result = LoginHandler::new(&state).execute(command).await?;

    Ok(Json(result))
}

// =========================================================================
// GET /me
// =========================================================================

/// Profile of the authenticated user. A token whose user no longer exists
/// is treated like bad credentials.
async fn me(State(state): State<AppState>, AuthUser(user_id): AuthUser) -> AppResult<Json<User>> {
    let user = state
        .store
        .users()
        .get_by_id(user_id)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    Ok(Json(user))
}

// =========================================================================
// Categories
// =========================================================================

async fn list_categories(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.store.categories().list(user_id).await?))
}

async fn get_category(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<Category>> {
    let category = state
        .store
        .categories()
        .get(user_id, id)
        .await?
        .ok_or(AppError::NotFound("Category"))?;

    Ok(Json(category))
}

async fn create_category(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(request): AppJson<CategoryRequest>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let fields = request.into_fields()?;
    let category = state.store.categories().create(user_id, &fields).await?;

    tracing::info!(user_id, category_id = category.id, "Category created");

    Ok((StatusCode::CREATED, Json(category)))
}

async fn update_category(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<CategoryRequest>,
) -> AppResult<Json<Category>> {
    let fields = request.into_fields()?;
    let category = state
        .store
        .categories()
        .update(user_id, id, &fields)
        .await?
        .ok_or(AppError::NotFound("Category"))?;

    tracing::info!(user_id, category_id = id, "Category updated");

    Ok(Json(category))
}

async fn delete_category(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<i64>,
) -> AppResult<StatusCode> {
    if state.store.categories().delete(user_id, id).await? {
        tracing::info!(user_id, category_id = id, "Category deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Category"))
    }
}

// =========================================================================
// Transactions
// =========================================================================

async fn list_transactions(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppQuery(query): AppQuery<TransactionQuery>,
) -> AppResult<Json<Vec<Transaction>>> {
    let filter = query.into_filter()?;

    Ok(Json(state.store.transactions().list(user_id, &filter).await?))
}

async fn get_transaction(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<Transaction>> {
    let transaction = state
        .store
        .transactions()
        .get(user_id, id)
        .await?
        .ok_or(AppError::NotFound("Transaction"))?;

    Ok(Json(transaction))
}

async fn create_transaction(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(request): AppJson<TransactionRequest>,
) -> AppResult<(StatusCode, Json<Transaction>)> {
    let fields = request.into_fields()?;
    let transaction = state.store.transactions().create(user_id, &fields).await?;

    tracing::info!(user_id, transaction_id = transaction.id, "Transaction created");

    Ok((StatusCode::CREATED, Json(transaction)))
}

async fn update_transaction(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<TransactionRequest>,
) -> AppResult<Json<Transaction>> {
    let fields = request.into_fields()?;
    let transaction = state
        .store
        .transactions()
        .update(user_id, id, &fields)
        .await?
        .ok_or(AppError::NotFound("Transaction"))?;

    tracing::info!(user_id, transaction_id = id, "Transaction updated");

    Ok(Json(transaction))
}

async fn delete_transaction(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<i64>,
) -> AppResult<StatusCode> {
    if state.store.transactions().delete(user_id, id).await? {
        tracing::info!(user_id, transaction_id = id, "Transaction deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Transaction"))
    }
}

// =========================================================================
// Budgets
// =========================================================================

async fn list_budgets(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppQuery(query): AppQuery<BudgetQuery>,
) -> AppResult<Json<Vec<Budget>>> {
    let filter = BudgetFilter {
        month: query.month,
        category_id: query.category_id,
    };

    Ok(Json(state.store.budgets().list(user_id, &filter).await?))
}

async fn get_budget(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<Budget>> {
    let budget = state
        .store
        .budgets()
        .get(user_id, id)
        .await?
        .ok_or(AppError::NotFound("Budget"))?;

    Ok(Json(budget))
}

async fn create_budget(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(request): AppJson<BudgetRequest>,
) -> AppResult<(StatusCode, Json<Budget>)> {
    let fields = BudgetFields::from(request);
    let budget = state.store.budgets().create(user_id, &fields).await?;

    tracing::info!(user_id, budget_id = budget.id, "Budget created");

    Ok((StatusCode::CREATED, Json(budget)))
}

async fn update_budget(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<BudgetRequest>,
) -> AppResult<Json<Budget>> {
    let fields = BudgetFields::from(request);
    let budget = state
        .store
        .budgets()
        .update(user_id, id, &fields)
        .await?
        .ok_or(AppError::NotFound("Budget"))?;

    tracing::info!(user_id, budget_id = id, "Budget updated");

    Ok(Json(budget))
}

async fn delete_budget(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<i64>,
) -> AppResult<StatusCode> {
    if state.store.budgets().delete(user_id, id).await? {
        tracing::info!(user_id, budget_id = id, "Budget deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Budget"))
    }
}

// =========================================================================
// GET /dashboard/summary
// =========================================================================

async fn dashboard_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppQuery(query): AppQuery<SummaryQuery>,
) -> AppResult<Json<MonthSummary>> {
    let month = query.month()?;

    Ok(Json(state.store.dashboard().summary(user_id, month).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_transaction_request_deserialize() {
        let request: TransactionRequest = serde_json::from_str(
            r#"{"amount":"12.50","type":"expense","date":"2024-03-20","description":"  lunch "}"#,
        )
        .unwrap();

        assert_eq!(request.category_id, None);
        assert_eq!(request.amount.value(), dec!(12.5));
        assert_eq!(request.kind, EntryType::Expense);

        let fields = request.into_fields().unwrap();
        assert_eq!(fields.description.as_deref(), Some("lunch"));
        assert_eq!(fields.date, NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
    }

    #[test]
    fn test_transaction_request_rejects_invalid_values() {
        for body in [
            r#"{"amount":0,"type":"expense","date":"2024-03-20"}"#,
            r#"{"amount":"1.001","type":"expense","date":"2024-03-20"}"#,
            r#"{"amount":5,"type":"transfer","date":"2024-03-20"}"#,
            r#"{"amount":5,"type":"income","date":"2024-02-30"}"#,
            r#"{"type":"income","date":"2024-03-20"}"#,
        ] {
            assert!(
                serde_json::from_str::<TransactionRequest>(body).is_err(),
                "{body}"
            );
        }
    }

    #[test]
    fn test_category_request_validates_name() {
        let request: CategoryRequest =
            serde_json::from_str(r#"{"name":"  Food ","type":"expense"}"#).unwrap();
        let fields = request.into_fields().unwrap();
        assert_eq!(fields.name, "Food");
        assert_eq!(fields.kind, EntryType::Expense);

        let request: CategoryRequest =
            serde_json::from_str(r#"{"name":" ","type":"income"}"#).unwrap();
        assert!(matches!(
            request.into_fields(),
            Err(ValidationError::InvalidName(_))
        ));
    }

    #[test]
    fn test_budget_request_deserialize() {
        let request: BudgetRequest = serde_json::from_str(
            r#"{"category_id":3,"period_month":"2024-03","limit_amount":250}"#,
        )
        .unwrap();
        let fields = BudgetFields::from(request);

        assert_eq!(fields.category_id, Some(3));
        assert_eq!(fields.period_month.to_string(), "2024-03");
        assert_eq!(fields.limit_amount.value(), dec!(250));

        assert!(serde_json::from_str::<BudgetRequest>(
            r#"{"period_month":"2024-13","limit_amount":250}"#
        )
        .is_err());
        assert!(serde_json::from_str::<BudgetRequest>(
            r#"{"period_month":"2024-3","limit_amount":250}"#
        )
        .is_err());
    }

    #[test]
    fn test_transaction_query_date_range() {
        let query = TransactionQuery {
            from: NaiveDate::from_ymd_opt(2024, 3, 31),
            to: NaiveDate::from_ymd_opt(2024, 3, 1),
            ..Default::default()
        };
        assert_eq!(
            query.into_filter().unwrap_err(),
            ValidationError::InvalidDateRange
        );

        let filter = TransactionQuery::default().into_filter().unwrap();
        assert!(filter.from.is_none() && filter.kind.is_none());
    }

    #[test]
    fn test_summary_query_month() {
        assert!(matches!(
            SummaryQuery { month: None }.month(),
            Err(AppError::MonthRequired)
        ));
        assert!(matches!(
            SummaryQuery {
                month: Some(" ".to_string())
            }
            .month(),
            Err(AppError::MonthRequired)
        ));
        assert!(matches!(
            SummaryQuery {
                month: Some("March".to_string())
            }
            .month(),
            Err(AppError::Validation(ValidationError::InvalidMonth(_)))
        ));

        let month = SummaryQuery {
            month: Some("2024-03".to_string()),
        }
        .month()
        .unwrap();
        assert_eq!(month.to_string(), "2024-03");
    }
}
