// src/api/handlers/system_handler.rs
use crate::api::AppState;
use crate::db::ping;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
}

/// ヘルスチェック（認証・レート制限なし）
pub async fn health_handler(State(app_state): State<AppState>) -> Json<HealthResponse> {
    let database_up = ping(&app_state.db).await;

    Json(HealthResponse {
        status: "ok",
        database: if database_up { "up" } else { "down" },
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn system_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}
