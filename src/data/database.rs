//! SQLite database operations
//!
//! All database access goes through this module.
//! Only inserts and selects are exposed; stored rows are never updated or
//! deleted.

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, QueryBuilder, Sqlite};
use std::path::Path;
use std::time::Instant;

use super::models::*;
use crate::error::AppError;
use crate::metrics::observe_db_query;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// (title, body) pairs per existence query, two binds each
pub(super) const EXISTS_CHUNK_SIZE: usize = 100;

/// Rows per multi-row INSERT, four binds each
pub(super) const INSERT_CHUNK_SIZE: usize = 200;

/// Database connection pool wrapper.
///
/// Created once at startup and shared through `AppState`. Call
/// [`Database::close`] on shutdown to release pooled connections.
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    // =========================================================================
    // Connection
    // =========================================================================

    /// Connect to SQLite database
    ///
    /// Creates the database file if it doesn't exist.
    /// Runs pending migrations automatically.
    ///
    /// # Arguments
    /// * `path` - Path to SQLite database file
    ///
    /// # Errors
    /// Returns error if connection or migration fails
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        Self::connect_with_options(path, DEFAULT_MAX_CONNECTIONS).await
    }

    /// Connect with an explicit pool size.
    pub async fn connect_with_options(path: &Path, max_connections: u32) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Migration failed: {}", e);
                AppError::Migration(e)
            })?;

        tracing::info!(
            path = %path.display(),
            max_connections,
            "Database connected and migrated successfully"
        );

        Ok(Self { pool })
    }

    pub(crate) fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Insert a user unless one with the same upstream id is already stored.
    ///
    /// Uniqueness is enforced by the `users.api_user_id` constraint, so
    /// concurrent inserts of the same id cannot both succeed.
    ///
    /// # Returns
    /// `true` if inserted, `false` if the upstream id was already present.
    pub async fn insert_user(&self, user: &NewUser) -> Result<bool, AppError> {
        let started = Instant::now();
        let result = sqlx::query(
            r#"
            INSERT INTO users (
                api_user_id, name, email, phone, website, city,
                company_name, catch_phrase, bs, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(api_user_id) DO NOTHING
            "#,
        )
        .bind(user.api_user_id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.website)
        .bind(&user.city)
        .bind(&user.company_name)
        .bind(&user.catch_phrase)
        .bind(&user.bs)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        observe_db_query("INSERT", "users", started);

        Ok(result.rows_affected() == 1)
    }

    /// Get a stored user by upstream id
    pub async fn get_user(&self, api_user_id: ExternalId) -> Result<Option<User>, AppError> {
        let started = Instant::now();
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE api_user_id = ?")
            .bind(api_user_id)
            .fetch_optional(&self.pool)
            .await?;
        observe_db_query("SELECT", "users", started);

        Ok(user)
    }

    /// Whether a user with this upstream id is stored
    pub async fn user_exists(&self, api_user_id: ExternalId) -> Result<bool, AppError> {
        let started = Instant::now();
        let found: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE api_user_id = ?)")
                .bind(api_user_id)
                .fetch_one(&self.pool)
                .await?;
        observe_db_query("SELECT", "users", started);

        Ok(found != 0)
    }

    // =========================================================================
    // Posts
    // =========================================================================

    /// Whether ANY of the given posts is stored for the owner.
    ///
    /// A post matches on exact (owner, title, body). One stored pair is
    /// enough for `true`, even if the rest of the batch is new. An empty
    /// batch is `false`.
    pub async fn posts_exist(
        &self,
        owner: ExternalId,
        posts: &[PostContent],
    ) -> Result<bool, AppError> {
        if posts.is_empty() {
            return Ok(false);
        }

        let started = Instant::now();
        let mut found = false;

        // SQLite caps bind parameters per statement, so check in chunks
        for chunk in posts.chunks(EXISTS_CHUNK_SIZE) {
            let mut builder =
                QueryBuilder::<Sqlite>::new("SELECT EXISTS(SELECT 1 FROM posts WHERE user_id = ");
            builder.push_bind(owner);
            builder.push(" AND (");
            for (index, post) in chunk.iter().enumerate() {
                if index > 0 {
                    builder.push(" OR ");
                }
                builder
                    .push("(title = ")
                    .push_bind(post.title.as_str())
                    .push(" AND body = ")
                    .push_bind(post.body.as_str())
                    .push(")");
            }
            builder.push("))");

            let matched: i64 = builder
                .build_query_scalar()
                .fetch_one(&self.pool)
                .await?;
            if matched != 0 {
                found = true;
                break;
            }
        }
        observe_db_query("SELECT", "posts", started);

        Ok(found)
    }

    /// Insert every post as a new row for the owner, atomically.
    ///
    /// No deduplication is done here. Either the whole batch is committed or
    /// nothing is. An empty batch inserts nothing and returns 0.
    ///
    /// # Returns
    /// Number of rows inserted
    pub async fn insert_posts(
        &self,
        owner: ExternalId,
        posts: &[PostContent],
    ) -> Result<u64, AppError> {
        if posts.is_empty() {
            return Ok(0);
        }

        let started = Instant::now();
        let created_at = Utc::now();

        // Rolled back on drop, including when this future is cancelled
        let mut tx = self.pool.begin().await?;

        let mut inserted = 0;
        for chunk in posts.chunks(INSERT_CHUNK_SIZE) {
            let mut builder =
                QueryBuilder::<Sqlite>::new("INSERT INTO posts (user_id, title, body, created_at) ");
            builder.push_values(chunk, |mut row, post| {
                row.push_bind(owner)
                    .push_bind(post.title.as_str())
                    .push_bind(post.body.as_str())
                    .push_bind(created_at);
            });
            inserted += builder.build().execute(&mut *tx).await?.rows_affected();
        }

        tx.commit().await?;
        observe_db_query("INSERT", "posts", started);

        Ok(inserted)
    }

    /// All posts stored for the owner, in insertion order
    pub async fn get_posts_by_owner(&self, owner: ExternalId) -> Result<Vec<Post>, AppError> {
        let started = Instant::now();
        let posts = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE user_id = ? ORDER BY id")
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        observe_db_query("SELECT", "posts", started);

        Ok(posts)
    }

    /// Number of posts stored for the owner
    pub async fn count_posts_by_owner(&self, owner: ExternalId) -> Result<i64, AppError> {
        let started = Instant::now();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE user_id = ?")
            .bind(owner)
            .fetch_one(&self.pool)
            .await?;
        observe_db_query("SELECT", "posts", started);

        Ok(count)
    }
}
