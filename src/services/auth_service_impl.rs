//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::db::{Store, verify_password};
use crate::models::user::{NewUser, User};
use crate::services::auth_service::{AuthError, AuthService};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, email: &str, name: &str, password: &str) -> Result<User, AuthError> {
        if self.store.email_registered(email).await? {
            return Err(AuthError::EmailTaken);
        }

        let new_user = NewUser {
            email: email.to_string(),
            name: name.to_string(),
            password: password.to_string(),
        };

        let user = self.store.create_user(&new_user, &self.security).await?;
        Ok(user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let Some((user, password_hash)) = self.store.get_user_with_password(email).await? else {
            warn!("Login attempt for unknown email");
            return Err(AuthError::UnknownEmail);
        };

        if !verify_password(password_hash, password).await? {
            warn!(user_id = user.id, "Login attempt with wrong password");
            return Err(AuthError::WrongPassword);
        }

        info!(user_id = user.id, "User logged in");
        Ok(user)
    }

    async fn get_user(&self, id: i32) -> Result<Option<User>, AuthError> {
        Ok(self.store.get_user(id).await?)
    }
}
