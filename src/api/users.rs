//! User endpoints

use axum::{
    Router,
    extract::State,
    response::Json,
    routing::{get, post},
};

use super::dto::{AddUserRequest, CheckUserQuery, ExistsResponse, MessageResponse};
use super::extract::{ApiJson, ApiQuery};
use crate::AppState;
use crate::error::AppError;
use crate::service::{ExistenceChecker, ImportService};

/// Create users router
///
/// Routes:
/// - GET /checkUser?api_user_id=<id> - Whether the user is stored
/// - POST /addUser - Store a user
pub fn users_router() -> Router<AppState> {
    Router::new()
        .route("/checkUser", get(check_user))
        .route("/addUser", post(add_user))
}

/// GET /checkUser
async fn check_user(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CheckUserQuery>,
) -> Result<Json<ExistsResponse>, AppError> {
    let exists = ExistenceChecker::new(state.db.clone())
        .user_exists(query.api_user_id)
        .await?;

    Ok(Json(ExistsResponse { exists }))
}

/// POST /addUser
///
/// Answers 409 if a user with the same `api_user_id` is already stored.
async fn add_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AddUserRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    ImportService::new(state.db.clone())
        .import_user(req.into())
        .await?;

    Ok(Json(MessageResponse::new("User added successfully")))
}
