pub mod cors;
pub mod flag_update;
pub mod trace;

pub use cors::cors;
pub use flag_update::FlagUpdatePayload;
pub use trace::log_requests;
