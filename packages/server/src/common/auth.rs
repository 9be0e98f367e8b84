//! Caller identity for domain actions.
//!
//! The HTTP layer verifies the bearer token and hands domains an [`Actor`];
//! domains never see raw tokens.

use thiserror::Error;

use super::entity_ids::UserId;

/// Authorization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Admin access required")]
    AdminRequired,

    #[error("Invalid or expired token")]
    InvalidToken,
}

/// The authenticated user performing an action.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: UserId,
    pub username: String,
    pub is_admin: bool,
}

impl Actor {
    pub fn new(user_id: UserId, username: impl Into<String>, is_admin: bool) -> Self {
        Self {
            user_id,
            username: username.into(),
            is_admin,
        }
    }

    /// Fails with [`AuthError::AdminRequired`] for non-admins.
    pub fn require_admin(&self) -> Result<(), AuthError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AuthError::AdminRequired)
        }
    }
}
