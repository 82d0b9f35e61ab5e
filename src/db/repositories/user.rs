use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tokio::task;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::{prelude::*, users};
use crate::models::user::{NewUser, User};

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    /// Get user by email together with the stored password hash (for login)
    pub async fn get_by_email_with_password(&self, email: &str) -> Result<Option<(User, String)>> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.map(|u| {
            let password_hash = u.password.clone();
            (User::from(u), password_hash)
        }))
    }

    pub async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let count = Users::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.conn)
            .await
            .context("Failed to count users by email")?;

        Ok(count > 0)
    }

    /// Hashes the password and inserts the account.
    /// Hashing runs in `spawn_blocking` since Argon2 is CPU-bound.
    pub async fn create(&self, new_user: &NewUser, security: &SecurityConfig) -> Result<User> {
        let password = new_user.password.clone();
        let security = security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, &security))
            .await
            .context("Password hashing task panicked")??;

        let active = users::ActiveModel {
            email: Set(new_user.email.clone()),
            name: Set(new_user.name.clone()),
            password: Set(password_hash),
            ..Default::default()
        };

        let res = Users::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to insert user")?;

        info!(user_id = res.last_insert_id, "Registered user {}", new_user.email);

        Ok(User {
            id: res.last_insert_id,
            email: new_user.email.clone(),
            name: new_user.name.clone(),
        })
    }

    pub async fn list_all(&self) -> Result<Vec<User>> {
        let rows = Users::find()
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list users")?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}

/// Checks a password against a stored PHC hash off the async runtime.
pub async fn verify_password(password_hash: String, password: &str) -> Result<bool> {
    let password = password.to_string();

    task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

        // Params are read from the hash itself, so default() verifies any config
        Ok::<bool, anyhow::Error>(
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok(),
        )
    })
    .await
    .context("Password verification task panicked")?
}

/// Hashes a password with Argon2id using the configured cost parameters.
pub fn hash_password(password: &str, security: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        security.argon2_memory_cost_kib,
        security.argon2_time_cost,
        security.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
