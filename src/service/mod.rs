pub mod flag_cache;
pub mod flag_service;

pub use flag_cache::FlagCache;
pub use flag_service::FlagService;
