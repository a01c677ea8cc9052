//! API module
//!
//! HTTP API endpoints and middleware.

pub mod extract;
pub mod middleware;
pub mod routes;
mod state;

pub use routes::{create_router, public_router};
pub use state::AppState;

use axum::http::{header::InvalidHeaderValue, HeaderValue};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::error::AppError;

/// CORS policy: a single allowed origin when configured, any origin otherwise.
pub fn cors_layer(allowed_origin: Option<&str>) -> Result<CorsLayer, InvalidHeaderValue> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    Ok(match allowed_origin {
        Some(origin) => layer.allow_origin(origin.parse::<HeaderValue>()?),
        None => layer.allow_origin(Any),
    })
}

/// Build the application router: public and gated routes under `/api`,
/// wrapped in request-id, tracing, CORS and logging layers.
pub fn app(state: AppState, cors: CorsLayer) -> Router {
    let protected = create_router().route_layer(axum::middleware::from_fn_with_state(
        state.clone(),
        middleware::auth_middleware,
    ));

    let api = public_router().merge(protected);

    // Outermost first. CORS sits inside the trace layer: `Cors` needs a
    // response body with a `Default` impl, which the traced body lacks.
    let layers = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum::middleware::from_fn(middleware::logging_middleware));

    Router::new()
        .nest("/api", api)
        .fallback(|| async { AppError::NotFound("Route") })
        .layer(layers)
        .with_state(state)
}
