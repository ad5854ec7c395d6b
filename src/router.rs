use std::sync::Arc;

use axum::{Router, middleware as axum_middleware, routing::get};

use crate::handlers::{flags, health};
use crate::middleware::{cors, log_requests};
use crate::service::FlagService;

/// Shared handler state. The service is built once at startup and injected here.
#[derive(Clone)]
pub struct FlagState {
    pub service: Arc<FlagService>,
}

impl FlagState {
    pub fn new(service: Arc<FlagService>) -> Self {
        Self { service }
    }
}

pub fn flag_router(state: FlagState) -> Router {
    Router::new()
        .route("/api/flags", get(flags::get_flags).post(flags::update_flag))
        .route("/api/health", get(health::health))
        .with_state(state)
        .layer(axum_middleware::from_fn(log_requests))
        .layer(axum_middleware::from_fn(cors))
}
