//! `GET /status`: liveness plus database and migration state. No auth.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migrations: Option<MigrationCounts>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MigrationCounts {
    pub total: usize,
    pub applied: usize,
}

pub async fn status(State(state): State<AppState>) -> (StatusCode, Json<StatusResponse>) {
    let migrations = if state.db.health_check().await {
        state.db.migration_status().await.ok()
    } else {
        None
    };

    match migrations {
        Some(m) => (
            StatusCode::OK,
            Json(StatusResponse {
                status: "online".to_string(),
                database: "connected".to_string(),
                migrations: Some(MigrationCounts {
                    total: m.total,
                    applied: m.applied,
                }),
            }),
        ),
        None => {
            error!("Status check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(StatusResponse {
                    status: "degraded".to_string(),
                    database: "unavailable".to_string(),
                    migrations: None,
                }),
            )
        }
    }
}
