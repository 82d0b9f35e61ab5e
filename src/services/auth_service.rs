//! Domain service for accounts and authentication.
//!
//! Handles registration and credential checks. Session binding is left to
//! the web layer.

use thiserror::Error;

use crate::models::user::User;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("This email has already been registered, try another")]
    EmailTaken,

    #[error("This email does not exist, please try another")]
    UnknownEmail,

    #[error("Password is incorrect, try again")]
    WrongPassword,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Whether the message is meant for the visitor (flash) rather than the log.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::EmailTaken | Self::UnknownEmail | Self::WrongPassword
        )
    }
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an account after checking the email is free.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmailTaken`] if the email is already registered.
    async fn register(&self, email: &str, name: &str, password: &str) -> Result<User, AuthError>;

    /// Verifies credentials and returns the account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UnknownEmail`] or [`AuthError::WrongPassword`].
    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError>;

    /// Loads the account bound to a session.
    async fn get_user(&self, id: i32) -> Result<Option<User>, AuthError>;
}
