use crate::AppState;
use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub destination_bucket: String,
    pub storage_class: String,
    pub version: String,
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        destination_bucket: state.relay.destination_bucket().to_string(),
        storage_class: state.relay.storage_class().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
