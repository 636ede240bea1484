use std::collections::HashSet;
use thiserror::Error;
use validator::Validate;

use crate::models::{CarrierRequirements, Load};

/// Contract violations caught at the engine boundary, before any scoring
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("Invalid carrier requirements: {0}")]
    InvalidRequirements(String),

    #[error("Invalid load at position {index} (id {load_id:?}): {reason}")]
    InvalidLoad {
        index: usize,
        load_id: String,
        reason: String,
    },

    #[error("Invalid load collection: {0}")]
    InvalidLoadCollection(String),
}

pub fn validate_requirements(requirements: &CarrierRequirements) -> Result<(), MatchError> {
    requirements
        .validate()
        .map_err(|errors| MatchError::InvalidRequirements(errors.to_string()))
}

/// Check every load record, then the collection as a whole
pub fn validate_loads(loads: &[Load]) -> Result<(), MatchError> {
    let mut seen_ids = HashSet::with_capacity(loads.len());

    for (index, load) in loads.iter().enumerate() {
        if load.id.trim().is_empty() {
            return Err(MatchError::InvalidLoad {
                index,
                load_id: load.id.clone(),
                reason: "load identifier is required".to_string(),
            });
        }

        load.validate().map_err(|errors| MatchError::InvalidLoad {
            index,
            load_id: load.id.clone(),
            reason: errors.to_string(),
        })?;

        if !seen_ids.insert(load.id.as_str()) {
            return Err(MatchError::InvalidLoadCollection(format!(
                "duplicate load identifier '{}'",
                load.id
            )));
        }
    }

    Ok(())
}
