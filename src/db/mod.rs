use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::models::post::{Comment, Post, PostContent};
use crate::models::user::{NewUser, User};

pub mod migrator;
pub mod repositories;

pub use repositories::user::verify_password;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    /// The underlying sqlx pool, shared with the session store.
    #[must_use]
    pub fn sqlite_pool(&self) -> &sea_orm::sqlx::SqlitePool {
        self.conn.get_sqlite_connection_pool()
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn post_repo(&self) -> repositories::post::PostRepository {
        repositories::post::PostRepository::new(self.conn.clone())
    }

    fn comment_repo(&self) -> repositories::comment::CommentRepository {
        repositories::comment::CommentRepository::new(self.conn.clone())
    }

    // Users

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_with_password(&self, email: &str) -> Result<Option<(User, String)>> {
        self.user_repo().get_by_email_with_password(email).await
    }

    pub async fn email_registered(&self, email: &str) -> Result<bool> {
        self.user_repo().exists_by_email(email).await
    }

    pub async fn create_user(&self, new_user: &NewUser, security: &SecurityConfig) -> Result<User> {
        self.user_repo().create(new_user, security).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list_all().await
    }

    // Posts

    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        self.post_repo().list_with_authors().await
    }

    pub async fn get_post(&self, id: i32) -> Result<Option<Post>> {
        self.post_repo().get_with_author(id).await
    }

    pub async fn post_title_taken(&self, title: &str, except_id: Option<i32>) -> Result<bool> {
        self.post_repo().title_taken(title, except_id).await
    }

    pub async fn create_post(
        &self,
        content: &PostContent,
        author_id: i32,
        date: &str,
    ) -> Result<i32> {
        self.post_repo().create(content, author_id, date).await
    }

    pub async fn update_post(
        &self,
        id: i32,
        content: &PostContent,
        author_id: i32,
    ) -> Result<bool> {
        self.post_repo().update(id, content, author_id).await
    }

    pub async fn delete_post(&self, id: i32) -> Result<bool> {
        self.post_repo().delete(id).await
    }

    pub async fn count_posts(&self) -> Result<u64> {
        self.post_repo().count().await
    }

    // Comments

    pub async fn add_comment(&self, post_id: i32, author_id: i32, text: &str) -> Result<i32> {
        self.comment_repo().add(post_id, author_id, text).await
    }

    pub async fn list_comments(&self, post_id: i32) -> Result<Vec<Comment>> {
        self.comment_repo().list_for_post(post_id).await
    }

    pub async fn count_comments(&self, post_id: i32) -> Result<u64> {
        self.comment_repo().count_for_post(post_id).await
    }
}
