//! Santa Algo - Constrained assignment service for Secret Santa exchanges
//!
//! This library provides the matching core used to draw a gift exchange:
//! a randomized retry search for a giver -> recipient bijection that honors
//! exclusion rules and avoids repeating recent years' pairings, plus the
//! storage, CSV, and email collaborators around it.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{is_complete_bijection, Engine, EngineError};
pub use models::{Assignment, ExclusionPair, MatchConstraints, Participant, YearData};
