//! Command Handlers module
//!
//! Handlers that orchestrate the credential flows: validation, bcrypt on the
//! blocking pool, persistence and token issuance.

mod auth_handler;
mod commands;

#[cfg(test)]
mod tests;

pub use auth_handler::{LoginHandler, RegisterHandler};
pub use commands::*;
