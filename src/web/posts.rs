use axum::{
    Extension, Form,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::forms::{self, CommentForm, PostForm};
use super::templates::{
    CommentView, IndexTemplate, Layout, PostFormTemplate, PostTemplate, load_layout, render,
};
use super::{AppError, AppState, flash};
use crate::models::user::User;
use crate::services::{BlogError, PostThread};

/// GET /
pub async fn index(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let (layout, _) = load_layout(&state, &session).await?;
    let posts = state.blog_service.list_posts().await?;
    render(&IndexTemplate { layout, posts })
}

fn post_page(
    layout: Layout,
    thread: PostThread,
    comment: String,
    errors: Vec<String>,
) -> Result<Html<String>, AppError> {
    render(&PostTemplate {
        layout,
        post: thread.post,
        comments: thread.comments.into_iter().map(CommentView::from).collect(),
        comment,
        errors,
    })
}

/// GET /post/{id}
pub async fn show_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let thread = state.blog_service.get_thread(id).await?;
    let (layout, _) = load_layout(&state, &session).await?;
    post_page(layout, thread, String::new(), vec![])
}

/// POST /post/{id}
/// Anonymous visitors are sent to the login page and nothing is stored
pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    session: Session,
    Form(form): Form<CommentForm>,
) -> Result<Response, AppError> {
    let Some(user) = super::auth::current_user(&state, &session).await? else {
        flash::push(&session, "You need to login or register to comment.").await?;
        return Ok(Redirect::to("/login").into_response());
    };

    let form = form.normalized();
    if let Err(errors) = forms::check(&form) {
        let thread = state.blog_service.get_thread(id).await?;
        let (layout, _) = load_layout(&state, &session).await?;
        return Ok(post_page(layout, thread, form.comment, errors)?.into_response());
    }

    state
        .blog_service
        .add_comment(id, &user, &form.comment)
        .await?;

    Ok(Redirect::to(&format!("/post/{id}")).into_response())
}

fn post_form_page(
    layout: Layout,
    heading: &str,
    action: String,
    form: PostForm,
    errors: Vec<String>,
) -> Result<Html<String>, AppError> {
    render(&PostFormTemplate {
        layout,
        heading: heading.to_string(),
        action,
        form,
        errors,
    })
}

/// GET /new-post
pub async fn new_post_form(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let (layout, _) = load_layout(&state, &session).await?;
    post_form_page(
        layout,
        "New Post",
        "/new-post".to_string(),
        PostForm::default(),
        vec![],
    )
}

/// POST /new-post
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<User>,
    session: Session,
    Form(form): Form<PostForm>,
) -> Result<Response, AppError> {
    let form = form.normalized();
    if let Err(errors) = forms::check(&form) {
        let (layout, _) = load_layout(&state, &session).await?;
        let page = post_form_page(layout, "New Post", "/new-post".to_string(), form, errors)?;
        return Ok(page.into_response());
    }

    match state
        .blog_service
        .create_post(&admin, &form.clone().into_content())
        .await
    {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(e @ BlogError::DuplicateTitle(_)) => {
            let (layout, _) = load_layout(&state, &session).await?;
            let page = post_form_page(
                layout,
                "New Post",
                "/new-post".to_string(),
                form,
                vec![e.to_string()],
            )?;
            Ok(page.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /edit-post/{id}
/// Pre-populates the form from the stored post
pub async fn edit_post_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let post = state.blog_service.get_post(id).await?;
    let (layout, _) = load_layout(&state, &session).await?;
    post_form_page(
        layout,
        "Edit Post",
        format!("/edit-post/{id}"),
        PostForm::from_post(&post),
        vec![],
    )
}

/// POST /edit-post/{id}
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Extension(admin): Extension<User>,
    session: Session,
    Form(form): Form<PostForm>,
) -> Result<Response, AppError> {
    let form = form.normalized();
    if let Err(errors) = forms::check(&form) {
        let (layout, _) = load_layout(&state, &session).await?;
        let page = post_form_page(layout, "Edit Post", format!("/edit-post/{id}"), form, errors)?;
        return Ok(page.into_response());
    }

    match state
        .blog_service
        .update_post(id, &admin, &form.clone().into_content())
        .await
    {
        Ok(()) => Ok(Redirect::to(&format!("/post/{id}")).into_response()),
        Err(e @ BlogError::DuplicateTitle(_)) => {
            let (layout, _) = load_layout(&state, &session).await?;
            let page = post_form_page(
                layout,
                "Edit Post",
                format!("/edit-post/{id}"),
                form,
                vec![e.to_string()],
            )?;
            Ok(page.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /delete/{id}
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Redirect, AppError> {
    state.blog_service.delete_post(id).await?;
    Ok(Redirect::to("/"))
}
