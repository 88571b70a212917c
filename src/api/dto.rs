//! Request and response DTOs
//!
//! Field names follow the JSON the browser UI already sends, which mixes
//! snake_case (`api_user_id`) and the upstream API's camelCase (`userId`).

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::data::{ExternalId, NewUser, PostContent};
use crate::error::AppError;

/// Upstream id as sent by the browser: a JSON number or a numeric string
#[derive(Deserialize)]
#[serde(untagged)]
enum RawExternalId {
    Number(i64),
    Text(String),
}

/// Deserialize an upstream id from either a number or a numeric string.
pub fn deserialize_external_id<'de, D>(deserializer: D) -> Result<ExternalId, D::Error>
where
    D: Deserializer<'de>,
{
    match RawExternalId::deserialize(deserializer)? {
        RawExternalId::Number(id) => Ok(id),
        RawExternalId::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid user id: {text:?}"))),
    }
}

// =============================================================================
// Users
// =============================================================================

/// GET /checkUser query
#[derive(Debug, Deserialize)]
pub struct CheckUserQuery {
    #[serde(deserialize_with = "deserialize_external_id")]
    pub api_user_id: ExternalId,
}

/// POST /addUser body
#[derive(Debug, Deserialize)]
pub struct AddUserRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub city: String,
    pub company_name: String,
    pub catch_phrase: String,
    pub bs: String,
    #[serde(deserialize_with = "deserialize_external_id")]
    pub api_user_id: ExternalId,
}

impl From<AddUserRequest> for NewUser {
    fn from(req: AddUserRequest) -> Self {
        Self {
            api_user_id: req.api_user_id,
            name: req.name,
            email: req.email,
            phone: req.phone,
            website: req.website,
            city: req.city,
            company_name: req.company_name,
            catch_phrase: req.catch_phrase,
            bs: req.bs,
        }
    }
}

// =============================================================================
// Posts
// =============================================================================

/// A post in upstream API shape; extra upstream fields such as `id` are ignored
#[derive(Debug, Deserialize)]
pub struct PostItem {
    #[serde(rename = "userId", deserialize_with = "deserialize_external_id")]
    pub user_id: ExternalId,
    pub title: String,
    pub body: String,
}

/// POST /bulkAddPosts and POST /checkPostsExist body
#[derive(Debug, Deserialize)]
pub struct PostsRequest {
    pub posts: Vec<PostItem>,
}

impl PostsRequest {
    /// Split the batch into its owner and post contents.
    ///
    /// # Returns
    /// `None` for an empty batch
    ///
    /// # Errors
    /// `Validation` if the posts belong to more than one user
    pub fn into_batch(self) -> Result<Option<(ExternalId, Vec<PostContent>)>, AppError> {
        let Some(owner) = self.posts.first().map(|post| post.user_id) else {
            return Ok(None);
        };

        if let Some(other) = self.posts.iter().find(|post| post.user_id != owner) {
            return Err(AppError::Validation(format!(
                "all posts must belong to one user (found {} and {})",
                owner, other.user_id
            )));
        }

        let contents = self
            .posts
            .into_iter()
            .map(|post| PostContent::new(post.title, post.body))
            .collect();
        Ok(Some((owner, contents)))
    }
}

/// GET /downloadPostsExcel query
#[derive(Debug, Deserialize)]
pub struct DownloadPostsQuery {
    #[serde(rename = "userId", deserialize_with = "deserialize_external_id")]
    pub user_id: ExternalId,
}

// =============================================================================
// Responses
// =============================================================================

/// `{ "exists": bool }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

/// `{ "message": "..." }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_id_accepts_number_and_numeric_string() {
        let from_number: CheckUserQuery =
            serde_json::from_value(serde_json::json!({ "api_user_id": 7 })).unwrap();
        let from_text: CheckUserQuery =
            serde_json::from_value(serde_json::json!({ "api_user_id": " 7 " })).unwrap();

        assert_eq!(from_number.api_user_id, 7);
        assert_eq!(from_text.api_user_id, 7);
    }

    #[test]
    fn external_id_rejects_non_numeric_string() {
        let result: Result<CheckUserQuery, _> =
            serde_json::from_value(serde_json::json!({ "api_user_id": "seven" }));
        assert!(result.is_err());
    }

    #[test]
    fn post_item_ignores_upstream_extra_fields() {
        let item: PostItem = serde_json::from_value(serde_json::json!({
            "userId": 1,
            "id": 1,
            "title": "sunt aut facere",
            "body": "quia et suscipit"
        }))
        .unwrap();

        assert_eq!(item.user_id, 1);
        assert_eq!(item.title, "sunt aut facere");
    }

    #[test]
    fn into_batch_groups_single_owner() {
        let request: PostsRequest = serde_json::from_value(serde_json::json!({
            "posts": [
                { "userId": 7, "title": "T1", "body": "B1" },
                { "userId": "7", "title": "T2", "body": "B2" }
            ]
        }))
        .unwrap();

        let (owner, posts) = request.into_batch().unwrap().unwrap();
        assert_eq!(owner, 7);
        assert_eq!(
            posts,
            vec![PostContent::new("T1", "B1"), PostContent::new("T2", "B2")]
        );
    }

    #[test]
    fn into_batch_empty_is_none() {
        let request = PostsRequest { posts: vec![] };
        assert!(request.into_batch().unwrap().is_none());
    }

    #[test]
    fn into_batch_rejects_mixed_owners() {
        let request: PostsRequest = serde_json::from_value(serde_json::json!({
            "posts": [
                { "userId": 1, "title": "a", "body": "b" },
                { "userId": 2, "title": "c", "body": "d" }
            ]
        }))
        .unwrap();

        assert!(matches!(
            request.into_batch(),
            Err(AppError::Validation(_))
        ));
    }
}
