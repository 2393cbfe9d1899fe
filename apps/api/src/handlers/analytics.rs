use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;

use revenda_core::analytics::{KpiWindow, Kpis, ProductStock, RecentSale, SaleRecord};
use revenda_core::RECENT_SALES_LIMIT;

use crate::auth::AuthUser;
use crate::error::{ApiResult, AppQuery};
use crate::AppState;

/// `?window=all|30d&limit=N`. A bad window or a non-numeric limit is a
/// `VALIDATION_ERROR` body like every other input error.
#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    pub window: Option<String>,
    pub limit: Option<usize>,
}

impl WindowQuery {
    fn window(&self) -> ApiResult<KpiWindow> {
        match self.window.as_deref() {
            None | Some("") => Ok(KpiWindow::default()),
            Some(raw) => Ok(raw.parse()?),
        }
    }
}

/// `GET /analytics/sales-history`
pub async fn sales_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Vec<SaleRecord>>> {
    Ok(Json(state.analytics().sales_history(user.id()).await?))
}

/// `GET /analytics/kpis`
pub async fn kpis(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppQuery(query): AppQuery<WindowQuery>,
) -> ApiResult<Json<Kpis>> {
    let window = query.window()?;
    Ok(Json(state.analytics().kpis(user.id(), window).await?))
}

/// `GET /analytics/recent-sales`
pub async fn recent_sales(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppQuery(query): AppQuery<WindowQuery>,
) -> ApiResult<Json<Vec<RecentSale>>> {
    let window = query.window()?;
    let limit = query.limit.unwrap_or(RECENT_SALES_LIMIT);
    Ok(Json(
        state
            .analytics()
            .recent_sales(user.id(), window, limit)
            .await?,
    ))
}

/// `GET /analytics/stock-summary`
pub async fn stock_summary(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Vec<ProductStock>>> {
    Ok(Json(state.analytics().stock_summary(user.id()).await?))
}
