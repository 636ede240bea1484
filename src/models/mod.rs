// Model exports
pub mod domain;
pub mod lenient;
pub mod requests;
pub mod responses;

pub use domain::{
    CarrierRequirements, Dimension, Load, LoadStatus, MatchResult, MatchingConfig, RateFlexibility,
    Recommendation, ScoringWeights, Thresholds, ToleranceBand, TruckType,
};
pub use requests::MatchLoadsRequest;
pub use responses::{BestMatchResponse, ErrorResponse, HealthResponse, MatchLoadsResponse};
