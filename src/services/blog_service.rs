//! Domain service for posts and comments.

use chrono::NaiveDate;
use thiserror::Error;

use crate::constants::posts::DATE_FORMAT;
use crate::models::post::{Comment, Post, PostContent};
use crate::models::user::User;

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("Post {0} not found")]
    PostNotFound(i32),

    #[error("A post titled '{0}' already exists")]
    DuplicateTitle(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for BlogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for BlogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A post page: the post and its comments in order.
#[derive(Debug, Clone)]
pub struct PostThread {
    pub post: Post,
    pub comments: Vec<Comment>,
}

#[async_trait::async_trait]
pub trait BlogService: Send + Sync {
    async fn list_posts(&self) -> Result<Vec<Post>, BlogError>;

    /// # Errors
    ///
    /// Returns [`BlogError::PostNotFound`] if no such post exists.
    async fn get_post(&self, id: i32) -> Result<Post, BlogError>;

    async fn get_thread(&self, id: i32) -> Result<PostThread, BlogError>;

    /// Publishes a post dated today with `author` as its author.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::DuplicateTitle`] if the title is in use.
    async fn create_post(&self, author: &User, content: &PostContent) -> Result<i32, BlogError>;

    /// Overwrites a post's content; `editor` becomes its author.
    async fn update_post(
        &self,
        id: i32,
        editor: &User,
        content: &PostContent,
    ) -> Result<(), BlogError>;

    /// Removes a post and its comments.
    async fn delete_post(&self, id: i32) -> Result<(), BlogError>;

    async fn add_comment(
        &self,
        post_id: i32,
        author: &User,
        text: &str,
    ) -> Result<i32, BlogError>;
}

/// Formats a publish date the way posts display it.
#[must_use]
pub fn format_publish_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[must_use]
pub fn today_publish_date() -> String {
    format_publish_date(chrono::Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_date_format() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        assert_eq!(format_publish_date(date), "April 01, 2024");

        let date = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap();
        assert_eq!(format_publish_date(date), "December 25, 2023");
    }
}
