//! Auth handlers: signup and login.

use axum::Json;
use axum::extract::State;

use crate::dto::request::{LoginRequest, SignupRequest};
use crate::dto::response::{LoginResponse, SignupResponse};
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /auth/signup
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> ApiResult<Json<SignupResponse>> {
    let issued = state.credential_manager.signup(req.into()).await?;
    Ok(Json(issued.into()))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let issued = state
        .credential_manager
        .login(&req.email, &req.password)
        .await?;
    Ok(Json(issued.into()))
}
