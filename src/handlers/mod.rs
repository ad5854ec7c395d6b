pub mod flags;
pub mod health;
