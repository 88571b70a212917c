//! Existence checks
//!
//! Answers whether upstream records are already stored, so the UI can decide
//! between offering an import and offering a download.

use std::sync::Arc;

use crate::data::{Database, ExternalId, PostContent};
use crate::error::AppError;

/// Existence checker
pub struct ExistenceChecker {
    db: Arc<Database>,
}

impl ExistenceChecker {
    /// Create new existence checker
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Whether a user with this upstream id is stored
    pub async fn user_exists(&self, api_user_id: ExternalId) -> Result<bool, AppError> {
        let exists = self.db.user_exists(api_user_id).await?;
        tracing::debug!(api_user_id, exists, "Checked user existence");
        Ok(exists)
    }

    /// Whether at least one of the posts is stored for the owner.
    ///
    /// This is an any-match: `true` does not mean the whole batch has been
    /// imported.
    pub async fn posts_exist(
        &self,
        owner: ExternalId,
        posts: &[PostContent],
    ) -> Result<bool, AppError> {
        let exists = self.db.posts_exist(owner, posts).await?;
        tracing::debug!(
            api_user_id = owner,
            checked = posts.len(),
            exists,
            "Checked post existence"
        );
        Ok(exists)
    }
}
