use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::fmt;

use super::templates::ErrorTemplate;
use crate::services::{AuthError, BlogError};

#[derive(Debug)]
pub enum AppError {
    NotFound(String),

    Forbidden,

    DatabaseError(String),

    TemplateError(String),

    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::TemplateError(msg) => write!(f, "Template error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "You don't have permission to access this page.".to_string(),
            ),
            AppError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            AppError::TemplateError(msg) => {
                tracing::error!("Template error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let page = ErrorTemplate {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Error").to_string(),
            message: message.clone(),
        };

        match askama::Template::render(&page) {
            Ok(body) => (status, Html(body)).into_response(),
            Err(_) => (status, message).into_response(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        AppError::InternalError(format!("Session error: {err}"))
    }
}

impl From<askama::Error> for AppError {
    fn from(err: askama::Error) -> Self {
        AppError::TemplateError(err.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Database(msg) => AppError::DatabaseError(msg),
            other => AppError::InternalError(other.to_string()),
        }
    }
}

impl From<BlogError> for AppError {
    fn from(err: BlogError) -> Self {
        match err {
            BlogError::PostNotFound(id) => AppError::post_not_found(id),
            BlogError::Database(msg) => AppError::DatabaseError(msg),
            other => AppError::InternalError(other.to_string()),
        }
    }
}

impl AppError {
    pub fn post_not_found(id: i32) -> Self {
        AppError::NotFound(format!("Post {} not found", id))
    }
}
