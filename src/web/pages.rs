use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::templates::{AboutTemplate, ContactTemplate, load_layout, render};
use super::{AppError, AppState};

/// GET /about
pub async fn about(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let (layout, _) = load_layout(&state, &session).await?;
    render(&AboutTemplate { layout })
}

/// GET /contact
pub async fn contact(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let (layout, _) = load_layout(&state, &session).await?;
    render(&ContactTemplate {
        layout,
        contact_email: state.config.site.contact_email.clone(),
    })
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            tracing::error!("Health check failed: {e}");
            (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
        }
    }
}

pub async fn not_found() -> AppError {
    AppError::NotFound("Page not found".to_string())
}
