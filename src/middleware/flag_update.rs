use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};

use crate::error::FlagError;
use crate::types::api::FlagUpdate;

/// Decodes the `POST /api/flags` body.
///
/// The body is parsed as JSON whatever the `Content-Type`; any read or decode
/// failure becomes a 400 before the handler runs, so no state is touched.
pub struct FlagUpdatePayload(pub FlagUpdate);

impl<S> FromRequest<S> for FlagUpdatePayload
where
    S: Send + Sync,
{
    type Rejection = FlagError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| FlagError::InvalidRequest(rejection.body_text()))?;

        let update: FlagUpdate = serde_json::from_slice(&body)
            .map_err(|e| FlagError::InvalidRequest(e.to_string()))?;
        Ok(Self(update))
    }
}
