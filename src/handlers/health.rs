use axum::Json;

use crate::types::api::HealthResponse;

/// Liveness only; the store is not probed.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
