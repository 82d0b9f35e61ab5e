use askama::Template;
use axum::response::Html;
use chrono::Datelike;
use tower_sessions::Session;

use super::{AppError, AppState, auth, flash};
use crate::models::post::{Comment, Post};
use crate::models::user::User;
use crate::web::forms::PostForm;
use crate::web::gravatar::avatar_url;

/// Values every page's header, navigation and footer need.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub site_title: String,
    pub site_subtitle: String,
    pub authenticated: bool,
    pub is_admin: bool,
    pub user_name: String,
    pub flashes: Vec<String>,
    pub year: i32,
}

impl Layout {
    #[must_use]
    pub fn new(state: &AppState, user: Option<&User>, flashes: Vec<String>) -> Self {
        Self {
            site_title: state.config.site.title.clone(),
            site_subtitle: state.config.site.subtitle.clone(),
            authenticated: user.is_some(),
            is_admin: user.is_some_and(User::is_admin),
            user_name: user.map(|u| u.name.clone()).unwrap_or_default(),
            flashes,
            year: chrono::Local::now().year(),
        }
    }
}

/// Resolves the visitor and drains their flash messages for a page render.
pub async fn load_layout(
    state: &AppState,
    session: &Session,
) -> Result<(Layout, Option<User>), AppError> {
    let user = auth::current_user(state, session).await?;
    let flashes = flash::take(session).await?;
    Ok((Layout::new(state, user.as_ref(), flashes), user))
}

pub fn render<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    Ok(Html(template.render()?))
}

#[derive(Debug, Clone)]
pub struct CommentView {
    pub text: String,
    pub author_name: String,
    pub avatar_url: String,
}

impl From<Comment> for CommentView {
    fn from(comment: Comment) -> Self {
        Self {
            avatar_url: avatar_url(&comment.author_email),
            text: comment.text,
            author_name: comment.author_name,
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub layout: Layout,
    pub posts: Vec<Post>,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub layout: Layout,
    pub post: Post,
    pub comments: Vec<CommentView>,
    pub comment: String,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub layout: Layout,
    pub email: String,
    pub name: String,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub email: String,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "make-post.html")]
pub struct PostFormTemplate {
    pub layout: Layout,
    pub heading: String,
    pub action: String,
    pub form: PostForm,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub layout: Layout,
}

#[derive(Template)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub layout: Layout,
    pub contact_email: String,
}

/// Standalone page used by error responses, which have no request state.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub reason: String,
    pub message: String,
}
