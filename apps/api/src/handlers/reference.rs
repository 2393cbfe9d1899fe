//! `/reference/{kind}` for the three reference kinds.
//!
//! An unknown `kind` segment is a 404.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use revenda_core::{NewReferenceItem, ReferenceItem, ReferenceKind};

use crate::auth::AuthUser;
use crate::error::{ApiResult, AppJson};
use crate::handlers::MessageResponse;
use crate::AppState;

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(kind): Path<String>,
) -> ApiResult<Json<Vec<ReferenceItem>>> {
    let kind: ReferenceKind = kind.parse()?;
    Ok(Json(state.reference().list(user.id(), kind).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(kind): Path<String>,
    AppJson(body): AppJson<NewReferenceItem>,
) -> ApiResult<(StatusCode, Json<ReferenceItem>)> {
    let kind: ReferenceKind = kind.parse()?;
    let item = state.reference().create(user.id(), kind, &body.name).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((kind, id)): Path<(String, String)>,
) -> ApiResult<Json<MessageResponse>> {
    let kind: ReferenceKind = kind.parse()?;
    state.reference().delete(user.id(), kind, &id).await?;
    Ok(Json(MessageResponse::new(format!("{} deleted", kind.label()))))
}
