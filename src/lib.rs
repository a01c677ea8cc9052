//! Personal finance tracker
//!
//! Re-exports modules for integration testing and the server binary.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod repository;

pub use api::AppState;
pub use config::Config;
pub use domain::{Amount, AmountError, EntryType, PeriodMonth, Principal, ValidationError};
pub use error::{AppError, AppResult};
pub use repository::{RepoError, Store};
