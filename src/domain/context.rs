//! Request principal
//!
//! Identity of the authenticated caller, bound to the request by the
//! authentication gate and read by every owner-scoped operation.

use axum::http::Extensions;
use serde::{Deserialize, Serialize};

/// Authenticated user for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: i64,
}

impl Principal {
    pub fn new(user_id: i64) -> Self {
        Self { user_id }
    }

    /// Bind this principal to a request.
    pub fn attach(self, extensions: &mut Extensions) {
        extensions.insert(self);
    }

    /// Look up the principal bound to a request.
    ///
    /// `None` means the gate did not run for this route, which is a wiring
    /// bug rather than a client error.
    pub fn from_extensions(extensions: &Extensions) -> Option<Self> {
        extensions.get::<Principal>().copied()
    }
}
