//! Data models
//!
//! Rust structs representing stored users and posts.
//! Rows are keyed locally by an integer id; the upstream API's id is kept
//! alongside as the join key between the two systems.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the upstream REST API
pub type ExternalId = i64;

// =============================================================================
// User
// =============================================================================

/// A stored user row
///
/// At most one row exists per `api_user_id`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    /// Upstream API id
    pub api_user_id: ExternalId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub city: String,
    pub company_name: String,
    pub catch_phrase: String,
    pub bs: String,
    pub created_at: DateTime<Utc>,
}

/// User fields supplied by an import request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub api_user_id: ExternalId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub city: String,
    pub company_name: String,
    pub catch_phrase: String,
    pub bs: String,
}

// =============================================================================
// Post
// =============================================================================

/// A stored post row
///
/// `user_id` holds the owner's upstream id, not `users.id`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub user_id: ExternalId,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// The content of a post, which is also its identity within an owner
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostContent {
    pub title: String,
    pub body: String,
}

impl PostContent {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

impl From<&Post> for PostContent {
    fn from(post: &Post) -> Self {
        Self::new(post.title.clone(), post.body.clone())
    }
}
