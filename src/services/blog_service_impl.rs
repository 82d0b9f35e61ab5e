//! `SeaORM` implementation of the `BlogService` trait.

use async_trait::async_trait;

use crate::db::Store;
use crate::models::post::{Post, PostContent};
use crate::models::user::User;
use crate::services::blog_service::{BlogError, BlogService, PostThread, today_publish_date};

pub struct SeaOrmBlogService {
    store: Store,
}

impl SeaOrmBlogService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BlogService for SeaOrmBlogService {
    async fn list_posts(&self) -> Result<Vec<Post>, BlogError> {
        Ok(self.store.list_posts().await?)
    }

    async fn get_post(&self, id: i32) -> Result<Post, BlogError> {
        self.store
            .get_post(id)
            .await?
            .ok_or(BlogError::PostNotFound(id))
    }

    async fn get_thread(&self, id: i32) -> Result<PostThread, BlogError> {
        let post = self.get_post(id).await?;
        let comments = self.store.list_comments(id).await?;
        Ok(PostThread { post, comments })
    }

    async fn create_post(&self, author: &User, content: &PostContent) -> Result<i32, BlogError> {
        if self.store.post_title_taken(&content.title, None).await? {
            return Err(BlogError::DuplicateTitle(content.title.clone()));
        }

        let date = today_publish_date();
        Ok(self.store.create_post(content, author.id, &date).await?)
    }

    async fn update_post(
        &self,
        id: i32,
        editor: &User,
        content: &PostContent,
    ) -> Result<(), BlogError> {
        if self.store.post_title_taken(&content.title, Some(id)).await? {
            return Err(BlogError::DuplicateTitle(content.title.clone()));
        }

        if self.store.update_post(id, content, editor.id).await? {
            Ok(())
        } else {
            Err(BlogError::PostNotFound(id))
        }
    }

    async fn delete_post(&self, id: i32) -> Result<(), BlogError> {
        if self.store.delete_post(id).await? {
            Ok(())
        } else {
            Err(BlogError::PostNotFound(id))
        }
    }

    async fn add_comment(
        &self,
        post_id: i32,
        author: &User,
        text: &str,
    ) -> Result<i32, BlogError> {
        // Checked up front so a bad id is a 404, not a foreign key failure
        self.get_post(post_id).await?;
        Ok(self.store.add_comment(post_id, author.id, text).await?)
    }
}
