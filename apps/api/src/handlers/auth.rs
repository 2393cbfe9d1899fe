use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};

use revenda_core::{LoginRequest, LoginResponse, PublicUser, RegisterRequest, SessionInfo};

use crate::auth::AuthUser;
use crate::error::{ApiResult, AppJson};
use crate::AppState;

/// `POST /auth/register`
pub async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<PublicUser>)> {
    let user = state.auth().register(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    Ok(Json(state.auth().login(req).await?))
}

/// `GET /auth/session`
pub async fn session(Extension(user): Extension<AuthUser>) -> Json<SessionInfo> {
    Json(user.0)
}
