use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{comments, prelude::*};
use crate::models::post::Comment;

pub struct CommentRepository {
    conn: DatabaseConnection,
}

impl CommentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(&self, post_id: i32, author_id: i32, text: &str) -> Result<i32> {
        let active = comments::ActiveModel {
            text: Set(text.to_string()),
            author_id: Set(author_id),
            post_id: Set(post_id),
            ..Default::default()
        };

        let res = Comments::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to insert comment")?;

        Ok(res.last_insert_id)
    }

    /// Comments of a post in submission order, each with its author
    pub async fn list_for_post(&self, post_id: i32) -> Result<Vec<Comment>> {
        let rows = Comments::find()
            .filter(comments::Column::PostId.eq(post_id))
            .find_also_related(Users)
            .order_by_asc(comments::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list comments")?;

        Ok(rows
            .into_iter()
            .map(|(comment, author)| Comment::from_models(comment, author))
            .collect())
    }

    pub async fn count_for_post(&self, post_id: i32) -> Result<u64> {
        Comments::find()
            .filter(comments::Column::PostId.eq(post_id))
            .count(&self.conn)
            .await
            .context("Failed to count comments")
    }
}
