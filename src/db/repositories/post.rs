use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::entities::{blog_posts, comments, prelude::*};
use crate::models::post::{Post, PostContent};

/// Repository for blog post operations
pub struct PostRepository {
    conn: DatabaseConnection,
}

impl PostRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_with_authors(&self) -> Result<Vec<Post>> {
        let rows = BlogPosts::find()
            .find_also_related(Users)
            .order_by_asc(blog_posts::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list posts")?;

        Ok(rows
            .into_iter()
            .map(|(post, author)| Post::from_models(post, author))
            .collect())
    }

    pub async fn get_with_author(&self, id: i32) -> Result<Option<Post>> {
        let row = BlogPosts::find_by_id(id)
            .find_also_related(Users)
            .one(&self.conn)
            .await
            .context("Failed to query post by ID")?;

        Ok(row.map(|(post, author)| Post::from_models(post, author)))
    }

    /// Whether another post already uses `title`. `except_id` excludes the
    /// post being edited.
    pub async fn title_taken(&self, title: &str, except_id: Option<i32>) -> Result<bool> {
        let mut query = BlogPosts::find().filter(blog_posts::Column::Title.eq(title));
        if let Some(id) = except_id {
            query = query.filter(blog_posts::Column::Id.ne(id));
        }

        let count = query
            .count(&self.conn)
            .await
            .context("Failed to check post title")?;

        Ok(count > 0)
    }

    pub async fn create(&self, content: &PostContent, author_id: i32, date: &str) -> Result<i32> {
        let active = blog_posts::ActiveModel {
            author_id: Set(author_id),
            title: Set(content.title.clone()),
            subtitle: Set(content.subtitle.clone()),
            date: Set(date.to_string()),
            body: Set(content.body.clone()),
            img_url: Set(content.img_url.clone()),
            ..Default::default()
        };

        let res = BlogPosts::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to insert post")?;

        info!(post_id = res.last_insert_id, "Created post '{}'", content.title);
        Ok(res.last_insert_id)
    }

    /// Overwrites the editable fields and author in place.
    /// Returns false if the post does not exist.
    pub async fn update(&self, id: i32, content: &PostContent, author_id: i32) -> Result<bool> {
        let Some(post) = BlogPosts::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query post for update")?
        else {
            return Ok(false);
        };

        let mut active: blog_posts::ActiveModel = post.into();
        active.title = Set(content.title.clone());
        active.subtitle = Set(content.subtitle.clone());
        active.body = Set(content.body.clone());
        active.img_url = Set(content.img_url.clone());
        active.author_id = Set(author_id);
        active
            .update(&self.conn)
            .await
            .context("Failed to update post")?;

        info!(post_id = id, "Updated post");
        Ok(true)
    }

    /// Deletes the post and its comments in one transaction.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let removed_comments = Comments::delete_many()
            .filter(comments::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .context("Failed to delete post comments")?;

        let result = BlogPosts::delete_by_id(id)
            .exec(&txn)
            .await
            .context("Failed to delete post")?;

        txn.commit().await?;

        if result.rows_affected > 0 {
            info!(
                post_id = id,
                comments = removed_comments.rows_affected,
                "Deleted post"
            );
        }

        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        BlogPosts::find()
            .count(&self.conn)
            .await
            .context("Failed to count posts")
    }
}
