use sqlx::FromRow;

use crate::error::FlagError;

/// Identifier of the single flag this service manages.
pub const FEATURE_FLAG: &str = "feature-flag-1";

/// Matches the `VARCHAR(99)` primary key.
pub const MAX_FLAG_NAME_LEN: usize = 99;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Flag {
    pub name: String,
    pub enabled: bool,
}

/// Reject names the `flags.name` column could not hold.
pub fn validate_flag_name(name: &str) -> Result<(), FlagError> {
    let len = name.chars().count();
    if len == 0 || len > MAX_FLAG_NAME_LEN {
        return Err(FlagError::InvalidFlagName(name.to_string()));
    }
    Ok(())
}
