// Core algorithm exports
pub mod engine;
pub mod rules;
pub mod validate;

pub use engine::{Engine, EngineError, DEFAULT_MAX_ATTEMPTS, DEFAULT_YEARS_TO_AVOID};
pub use rules::{has_recent_match, is_excluded_pair, is_valid_assignment};
pub use validate::is_complete_bijection;
