use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub provider_backend: String,
    pub template_versions: usize,
    pub users: usize,
    pub emails: usize,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        provider_backend: state.settings.provider.backend.clone(),
        template_versions: state.templates.list().await.len(),
        users: state.users.list().await.len(),
        emails: state.emails.list().await.len(),
    })
}
