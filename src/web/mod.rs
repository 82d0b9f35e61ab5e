use axum::{Router, middleware, routing::get};
use sha2::{Digest, Sha512};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;
use tracing::warn;

use crate::config::{Config, SecurityConfig};
use crate::db::Store;
use crate::services::{AuthService, BlogService, SeaOrmAuthService, SeaOrmBlogService};

mod assets;
pub mod auth;
mod error;
pub mod flash;
pub mod forms;
pub mod gravatar;
mod observability;
mod pages;
mod posts;
pub mod templates;

pub use error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub store: Store,

    pub session_store: SqliteStore,

    pub auth_service: Arc<dyn AuthService>,

    pub blog_service: Arc<dyn BlogService>,
}

impl AppState {
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }
}

pub async fn create_app_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_url,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let session_store = SqliteStore::new(store.sqlite_pool().clone());
    session_store
        .migrate()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to migrate session store: {e}"))?;

    let auth_service = Arc::new(SeaOrmAuthService::new(
        store.clone(),
        config.security.clone(),
    ));
    let blog_service = Arc::new(SeaOrmBlogService::new(store.clone()));

    Ok(Arc::new(AppState {
        config: Arc::new(config),
        store,
        session_store,
        auth_service,
        blog_service,
    }))
}

/// Cookie signing key. `SECRET_KEY` of any length is stretched to the 64
/// bytes the signer needs.
fn session_key(security: &SecurityConfig) -> Key {
    match security.secret_key.as_deref() {
        Some(secret) => Key::from(Sha512::digest(secret.as_bytes()).as_slice()),
        None => {
            warn!("SECRET_KEY is not set; sessions will not survive a restart");
            Key::generate()
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let config = &state.config;

    let session_layer = SessionManagerLayer::new(state.session_store.clone())
        .with_secure(config.server.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            config.server.session_expiry_minutes,
        )))
        .with_signed(session_key(&config.security));

    let admin_routes = create_admin_router(state.clone());

    Router::new()
        .route("/", get(posts::index))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/post/{id}", get(posts::show_post).post(posts::add_comment))
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact))
        .route("/health", get(pages::health))
        .route("/static/{*path}", get(assets::serve_asset))
        .merge(admin_routes)
        .fallback(pages::not_found)
        .layer(session_layer)
        .with_state(state)
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(TraceLayer::new_for_http())
}

fn create_admin_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/new-post",
            get(posts::new_post_form).post(posts::create_post),
        )
        .route(
            "/edit-post/{id}",
            get(posts::edit_post_form).post(posts::update_post),
        )
        .route("/delete/{id}", get(posts::delete_post))
        .route_layer(middleware::from_fn_with_state(state, auth::require_admin))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_key_is_stable_for_a_secret() {
        let security = SecurityConfig {
            secret_key: Some("short".to_string()),
            ..SecurityConfig::default()
        };

        assert_eq!(
            session_key(&security).master(),
            session_key(&security).master()
        );
    }
}
