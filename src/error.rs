use axum::{http::StatusCode, response::IntoResponse};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum FlagError {
    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("could not connect to database after {attempts} attempts: {source}")]
    Connect {
        attempts: u32,
        #[source]
        source: SqlxError,
    },

    #[error("flag `{0}` not found")]
    FlagNotFound(String),

    #[error("invalid flag name `{0}`: must be 1..=99 characters")]
    InvalidFlagName(String),

    #[error("unsupported database url scheme: {0}")]
    UnsupportedDatabase(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request data: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for FlagError {
    fn from(e: figment::Error) -> Self {
        FlagError::Config(e.to_string())
    }
}

impl IntoResponse for FlagError {
    fn into_response(self) -> axum::response::Response {
        // Plain-text bodies only; the underlying cause stays in the logs.
        let (status, body) = match self {
            FlagError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "Invalid request data"),
            FlagError::Database(_)
            | FlagError::Connect { .. }
            | FlagError::FlagNotFound(_)
            | FlagError::InvalidFlagName(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error"),
            FlagError::UnsupportedDatabase(_) | FlagError::Config(_) | FlagError::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
            }
        };
        (status, body).into_response()
    }
}
