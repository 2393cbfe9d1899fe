use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use revenda_core::{Product, ProductFields};

use crate::auth::AuthUser;
use crate::error::{ApiResult, AppJson};
use crate::handlers::MessageResponse;
use crate::AppState;

/// `GET /products`
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.products().list(user.id()).await?))
}

/// `POST /products`
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(fields): AppJson<ProductFields>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let product = state.products().create(user.id(), fields).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /products/{id}`
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    AppJson(fields): AppJson<ProductFields>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.products().update(user.id(), &id, fields).await?))
}

/// `DELETE /products/{id}`
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.products().delete(user.id(), &id).await?;
    Ok(Json(MessageResponse::new("Product deleted")))
}
