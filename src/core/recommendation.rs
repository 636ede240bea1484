use serde::{Deserialize, Serialize};

use crate::models::{CarrierRequirements, MatchResult, Recommendation, Thresholds};

/// Tier for a scored load. `Reject` is reserved for mandatory-gate failures.
#[inline]
pub fn classify(overall_score: f64, mandatory_match: bool, thresholds: &Thresholds) -> Recommendation {
    if !mandatory_match {
        Recommendation::Reject
    } else if overall_score >= thresholds.auto_approve {
        Recommendation::AutoApprove
    } else if overall_score >= thresholds.human_review {
        Recommendation::HumanReview
    } else {
        Recommendation::CreateLead
    }
}

/// What the dispatcher should do with the call as a whole
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecommendation {
    pub action: Recommendation,
    /// Load behind the action, if any
    pub load_id: Option<String>,
    pub reasoning: String,
}

/// Decide the call-level action from ranked results.
///
/// With no acceptable load, a call that yielded truck or location details
/// becomes a lead for later; one that yielded neither is rejected.
pub fn recommend_action(
    requirements: &CarrierRequirements,
    results: &[MatchResult],
) -> ActionRecommendation {
    let best = results
        .iter()
        .filter(|r| !r.is_rejected())
        .max_by(|a, b| {
            a.overall_score
                .total_cmp(&b.overall_score)
                // max_by keeps the last of equals; prefer the smaller id
                .then_with(|| b.load_id.cmp(&a.load_id))
        });

    let Some(best) = best else {
        if !requirements.has_truck_info() && !requirements.has_location_info() {
            return ActionRecommendation {
                action: Recommendation::Reject,
                load_id: None,
                reasoning: "Insufficient truck or location information from the call".to_string(),
            };
        }
        return ActionRecommendation {
            action: Recommendation::CreateLead,
            load_id: None,
            reasoning: "Carrier details captured but no compatible load is open; create a lead for follow-up"
                .to_string(),
        };
    };

    let percent = best.overall_score * 100.0;
    let reasoning = match best.recommendation {
        Recommendation::AutoApprove => {
            format!("High confidence match with load {} ({:.0}%)", best.load_id, percent)
        }
        Recommendation::HumanReview => format!(
            "Good match with load {} ({:.0}%) but needs human review",
            best.load_id, percent
        ),
        _ => format!(
            "Best available load {} only matches moderately ({:.0}%); create a lead for follow-up",
            best.load_id, percent
        ),
    };

    ActionRecommendation {
        action: best.recommendation,
        load_id: Some(best.load_id.clone()),
        reasoning,
    }
}
