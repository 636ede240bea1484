use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{CarrierRequirements, Load};

/// Request to match one carrier against a load catalog snapshot
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchLoadsRequest {
    pub requirements: CarrierRequirements,
    #[serde(default)]
    pub loads: Vec<Load>,
    /// Cap on returned matches
    #[validate(range(min = 1, max = 100))]
    #[serde(default)]
    pub limit: Option<u16>,
}
