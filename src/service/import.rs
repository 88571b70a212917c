//! Import service
//!
//! Stores users and post batches fetched from the upstream API.

use std::sync::Arc;

use crate::data::{Database, ExternalId, NewUser, PostContent};
use crate::error::AppError;
use crate::metrics::{POSTS_IMPORTED_TOTAL, USERS_IMPORTED_TOTAL};

/// Import service
pub struct ImportService {
    db: Arc<Database>,
}

impl ImportService {
    /// Create new import service
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Store a user.
    ///
    /// # Errors
    /// - `Validation` if the name is blank
    /// - `Conflict` if a user with the same upstream id is already stored
    pub async fn import_user(&self, user: NewUser) -> Result<(), AppError> {
        if user.name.trim().is_empty() {
            return Err(AppError::Validation("name must not be empty".to_string()));
        }

        if !self.db.insert_user(&user).await? {
            tracing::info!(api_user_id = user.api_user_id, "User already stored");
            return Err(AppError::Conflict(format!(
                "User {} already exists",
                user.api_user_id
            )));
        }

        USERS_IMPORTED_TOTAL.inc();
        tracing::info!(
            api_user_id = user.api_user_id,
            name = %user.name,
            "User added to database"
        );
        Ok(())
    }

    /// Store every post of the batch for the owner in one transaction.
    ///
    /// Callers are expected to have checked existence first; nothing is
    /// deduplicated here. An empty batch is a no-op.
    ///
    /// # Returns
    /// Number of posts stored
    pub async fn import_posts(
        &self,
        owner: ExternalId,
        posts: &[PostContent],
    ) -> Result<u64, AppError> {
        if posts.is_empty() {
            tracing::debug!(api_user_id = owner, "No posts to add");
            return Ok(0);
        }

        let inserted = self.db.insert_posts(owner, posts).await?;

        POSTS_IMPORTED_TOTAL.inc_by(inserted);
        tracing::info!(api_user_id = owner, count = inserted, "Posts added to database");
        Ok(inserted)
    }
}
