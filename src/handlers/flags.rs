use axum::{Json, extract::State};

use crate::error::FlagError;
use crate::middleware::FlagUpdatePayload;
use crate::router::FlagState;
use crate::types::api::{FlagStates, UpdateResponse};

/// `GET /api/flags`: served from memory, never fails.
pub async fn get_flags(State(state): State<FlagState>) -> Json<FlagStates> {
    let service = &state.service;
    Json(FlagStates::single(service.flag_name(), service.get_state()))
}

/// `POST /api/flags`
pub async fn update_flag(
    State(state): State<FlagState>,
    FlagUpdatePayload(update): FlagUpdatePayload,
) -> Result<Json<UpdateResponse>, FlagError> {
    state.service.set_state(update.state).await?;
    Ok(Json(UpdateResponse { success: true }))
}
