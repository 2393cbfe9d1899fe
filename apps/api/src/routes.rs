//! Router assembly.
//!
//! ```text
//! /status                     public
//! /auth/register, /auth/login public
//! everything else             require_auth ─► handler
//! ```

use axum::http::HeaderValue;
use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::auth::require_auth;
use crate::handlers::{analytics, auth, products, reference, status, stock};
use crate::AppState;

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/status", get(status::status))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let protected = Router::new()
        .route("/auth/session", get(auth::session))
        .route("/products", get(products::list).post(products::create))
        .route("/products/{id}", put(products::update).delete(products::delete))
        .route("/stock", get(stock::list))
        .route("/stock/intake", post(stock::intake))
        .route("/stock/{id}", get(stock::get).delete(stock::delete))
        .route("/stock/{id}/sell", post(stock::sell))
        .route("/reference/{kind}", get(reference::list).post(reference::create))
        .route("/reference/{kind}/{id}", delete(reference::delete))
        .route("/analytics/sales-history", get(analytics::sales_history))
        .route("/analytics/kpis", get(analytics::kpis))
        .route("/analytics/recent-sales", get(analytics::recent_sales))
        .route("/analytics/stock-summary", get(analytics::stock_summary))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(state.config.frontend_url.as_deref()))
        .with_state(state)
}

/// CORS for the web frontend. Any origin when none is configured.
fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match frontend_url.map(HeaderValue::from_str) {
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(_)) => {
            warn!("frontend_url is not a valid origin; allowing any origin");
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}
