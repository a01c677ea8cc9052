//! Domain module
//!
//! Core domain types shared by the data-access layer and the HTTP surface.

pub mod amount;
pub mod context;
pub mod entry;
pub mod error;
pub mod month;
pub mod validation;

pub use amount::{Amount, AmountError};
pub use context::Principal;
pub use entry::EntryType;
pub use error::ValidationError;
pub use month::PeriodMonth;
