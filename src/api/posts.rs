//! Post endpoints

use axum::{
    Router,
    extract::State,
    http::header,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};

use super::dto::{DownloadPostsQuery, ExistsResponse, MessageResponse, PostsRequest};
use super::extract::{ApiJson, ApiQuery};
use crate::AppState;
use crate::error::AppError;
use crate::service::{ExistenceChecker, ExportService, ImportService};

/// MIME type of `.xlsx` workbooks
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const XLSX_CONTENT_DISPOSITION: &str = "attachment; filename=posts.xlsx";

/// Create posts router
///
/// Routes:
/// - POST /bulkAddPosts - Store a batch of posts
/// - POST /checkPostsExist - Whether any post of a batch is stored
/// - GET /downloadPostsExcel?userId=<id> - Stored posts as a spreadsheet
pub fn posts_router() -> Router<AppState> {
    Router::new()
        .route("/bulkAddPosts", post(bulk_add_posts))
        .route("/checkPostsExist", post(check_posts_exist))
        .route("/downloadPostsExcel", get(download_posts_excel))
}

/// POST /bulkAddPosts
///
/// An empty batch succeeds without touching the database.
async fn bulk_add_posts(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<PostsRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let Some((owner, posts)) = req.into_batch()? else {
        return Ok(Json(MessageResponse::new("No posts to add")));
    };

    ImportService::new(state.db.clone())
        .import_posts(owner, &posts)
        .await?;

    Ok(Json(MessageResponse::new("Posts added successfully")))
}

/// POST /checkPostsExist
///
/// `exists` is true when at least one post of the batch is stored.
async fn check_posts_exist(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<PostsRequest>,
) -> Result<Json<ExistsResponse>, AppError> {
    let (owner, posts) = req
        .into_batch()?
        .ok_or_else(|| AppError::Validation("posts must not be empty".to_string()))?;

    let exists = ExistenceChecker::new(state.db.clone())
        .posts_exist(owner, &posts)
        .await?;

    Ok(Json(ExistsResponse { exists }))
}

/// GET /downloadPostsExcel
async fn download_posts_excel(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DownloadPostsQuery>,
) -> Result<Response, AppError> {
    let bytes = ExportService::new(state.db.clone())
        .export_user_posts(query.user_id)
        .await?;

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE),
            (header::CONTENT_DISPOSITION, XLSX_CONTENT_DISPOSITION),
        ],
        bytes,
    )
        .into_response())
}
