use axum::{
    Form,
    extract::{Request, State},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::forms::{self, LoginForm, RegisterForm};
use super::templates::{LoginTemplate, RegisterTemplate, load_layout, render};
use super::{AppError, AppState, flash};
use crate::constants::auth::SESSION_USER_KEY;
use crate::models::user::User;
use crate::services::AuthError;

// ============================================================================
// Session helpers
// ============================================================================

/// The logged-in user, or `None` for anonymous visitors. A session naming an
/// account that no longer exists counts as anonymous.
pub async fn current_user(state: &AppState, session: &Session) -> Result<Option<User>, AppError> {
    let Some(user_id) = session.get::<i32>(SESSION_USER_KEY).await? else {
        return Ok(None);
    };

    let user = state.auth_service.get_user(user_id).await?;
    if let Some(user) = &user {
        tracing::Span::current().record("user_id", user.id);
    }

    Ok(user)
}

async fn log_in(session: &Session, user: &User) -> Result<(), AppError> {
    // New id on privilege change
    session.cycle_id().await?;
    session.insert(SESSION_USER_KEY, user.id).await?;
    Ok(())
}

// ============================================================================
// Middleware
// ============================================================================

/// Lets the request through only for the administrator; everyone else,
/// anonymous visitors included, gets 403. The admin is handed to the
/// handler as an `Extension<User>`.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match current_user(&state, &session).await? {
        Some(user) if user.is_admin() => {
            request.extensions_mut().insert(user);
            Ok(next.run(request).await)
        }
        Some(user) => {
            tracing::warn!(user_id = user.id, "Non-admin tried to manage posts");
            Err(AppError::Forbidden)
        }
        None => Err(AppError::Forbidden),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /register
pub async fn register_form(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let (layout, _) = load_layout(&state, &session).await?;
    render(&RegisterTemplate {
        layout,
        email: String::new(),
        name: String::new(),
        errors: vec![],
    })
}

/// POST /register
/// Creates the account and logs it in
pub async fn register(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let form = form.normalized();

    if let Err(errors) = forms::check(&form) {
        let (layout, _) = load_layout(&state, &session).await?;
        let page = render(&RegisterTemplate {
            layout,
            email: form.email,
            name: form.name,
            errors,
        })?;
        return Ok(page.into_response());
    }

    match state
        .auth_service
        .register(&form.email, &form.name, &form.password)
        .await
    {
        Ok(user) => {
            log_in(&session, &user).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(e @ AuthError::EmailTaken) => {
            flash::push(&session, e.to_string()).await?;
            Ok(Redirect::to("/register").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /login
pub async fn login_form(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let (layout, _) = load_layout(&state, &session).await?;
    render(&LoginTemplate {
        layout,
        email: String::new(),
        errors: vec![],
    })
}

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let form = LoginForm {
        email: form.email.trim().to_string(),
        ..form
    };

    if let Err(errors) = forms::check(&form) {
        let (layout, _) = load_layout(&state, &session).await?;
        let page = render(&LoginTemplate {
            layout,
            email: form.email,
            errors,
        })?;
        return Ok(page.into_response());
    }

    match state.auth_service.login(&form.email, &form.password).await {
        Ok(user) => {
            log_in(&session, &user).await?;
            flash::push(&session, "Logged in successfully").await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(e) if e.is_user_facing() => {
            flash::push(&session, e.to_string()).await?;
            Ok(Redirect::to("/login").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /logout
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    session.flush().await?;
    Ok(Redirect::to("/"))
}
