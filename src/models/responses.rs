use serde::{Deserialize, Serialize};

use crate::core::recommendation::ActionRecommendation;
use crate::models::domain::MatchResult;

/// Response for the match loads endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchLoadsResponse {
    pub matches: Vec<MatchResult>,
    pub total_loads: usize,
    pub available_loads: usize,
    pub action: ActionRecommendation,
}

/// Response for the best match endpoint; `best_match` is null when nothing matched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestMatchResponse {
    pub best_match: Option<MatchResult>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
