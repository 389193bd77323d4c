//! User management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use crate::dto::request::UpdateUserRequest;
use crate::dto::response::{MessageResponse, UserEnvelope, UserListResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<UserListResponse>> {
    let page = state
        .account_service
        .list_users(&auth, &params.into_page_request())
        .await?;
    Ok(Json(page.into()))
}

/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserEnvelope>> {
    let user = state.account_service.get_user(&auth, &user_id).await?;
    Ok(Json(UserEnvelope { user: user.into() }))
}

/// PUT /users/{user_id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .account_service
        .update_user(&auth, &user_id, req.into())
        .await?;
    Ok(Json(MessageResponse::new("User updated successfully")))
}

/// DELETE /users/{user_id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.account_service.delete_user(&auth, &user_id).await?;
    Ok(Json(MessageResponse::new(format!(
        "User {user_id} deleted successfully"
    ))))
}
