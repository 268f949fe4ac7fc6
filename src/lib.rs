pub mod api;
pub mod config;
pub mod infrastructure;
pub mod models;
pub mod services;

use crate::services::relay::RelayHandler;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RelayHandler>,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", post(api::handlers::events::receive_event))
        .route("/health", get(api::handlers::health::health_check))
        .with_state(state)
}
