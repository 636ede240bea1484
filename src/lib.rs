//! Freight Match - load matching engine for phone-brokered freight dispatch
//!
//! This library scores a carrier's extracted requirements (truck type,
//! length, tonnage, location, rate) against a snapshot of open loads and
//! returns ranked, explained matches with a recommended next action.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;

// Re-export commonly used types
pub use core::{FuzzyMatcher, LoadMatcher, MatchError, MatchObserver};
pub use models::{CarrierRequirements, Load, LoadStatus, MatchResult, MatchingConfig, Recommendation, TruckType};
