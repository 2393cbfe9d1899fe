use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use revenda_core::{IntakeBatch, IntakeReceipt, SaleInput, StockUnit};

use crate::auth::AuthUser;
use crate::error::{ApiResult, AppJson};
use crate::handlers::MessageResponse;
use crate::AppState;

/// `GET /stock`
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Vec<StockUnit>>> {
    Ok(Json(state.stock().list(user.id()).await?))
}

/// `GET /stock/{id}`
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<StockUnit>> {
    Ok(Json(state.stock().get(user.id(), &id).await?))
}

/// `POST /stock/intake`
pub async fn intake(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(batch): AppJson<IntakeBatch>,
) -> ApiResult<(StatusCode, Json<IntakeReceipt>)> {
    let receipt = state.stock().intake_batch(user.id(), batch).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// `POST /stock/{id}/sell`
pub async fn sell(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    AppJson(sale): AppJson<SaleInput>,
) -> ApiResult<Json<StockUnit>> {
    Ok(Json(state.stock().sell(user.id(), &id, sale).await?))
}

/// `DELETE /stock/{id}`
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.stock().delete(user.id(), &id).await?;
    Ok(Json(MessageResponse::new("Stock unit deleted")))
}
