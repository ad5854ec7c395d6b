use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `POST /api/flags` body. `state` is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FlagUpdate {
    pub state: bool,
}

/// `GET /api/flags` body: flag name mapped to its current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FlagStates(pub BTreeMap<String, bool>);

impl FlagStates {
    pub fn single(name: &str, enabled: bool) -> Self {
        Self(BTreeMap::from([(name.to_string(), enabled)]))
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct UpdateResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
