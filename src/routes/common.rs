//! Liveness, readiness and build info, mounted outside `/api/v1`.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

/// Body of `/health` and `/ready`. Only `/ready` reports `store`.
#[derive(Debug, Serialize)]
struct Status {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    store: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct BuildInfo {
    name: &'static str,
    version: &'static str,
}

const BUILD: BuildInfo = BuildInfo {
    name: env!("CARGO_PKG_NAME"),
    version: env!("CARGO_PKG_VERSION"),
};

async fn alive() -> Json<Status> {
    Json(Status {
        status: "ok",
        store: None,
    })
}

/// 200 while the catalog store answers a ping, 503 otherwise.
async fn store_ready(State(state): State<AppState>) -> (StatusCode, Json<Status>) {
    match state.health.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(Status {
                status: "ok",
                store: Some("ok"),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "catalog store not ready");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Status {
                    status: "degraded",
                    store: Some("unavailable"),
                }),
            )
        }
    }
}

async fn build_info() -> Json<BuildInfo> {
    Json(BUILD)
}

pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(alive))
        .route("/ready", get(store_ready))
        .route("/version", get(build_info))
        .with_state(state)
}
