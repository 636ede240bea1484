use std::cmp::Ordering;

use crate::models::{Load, LoadStatus, MatchResult};

/// Only loads still open for booking take part in matching
#[inline]
pub fn is_matchable(load: &Load) -> bool {
    load.status == LoadStatus::Available
}

/// Mandatory truck-type gate.
///
/// A score below `incompatibility` fails; an unknown score (either side
/// missing) always passes.
#[inline]
pub fn passes_mandatory_gate(truck_type_score: Option<f64>, incompatibility: f64) -> bool {
    truck_type_score.map_or(true, |score| score >= incompatibility)
}

/// Ranking order: non-rejected first, then overall score descending, then load id
pub fn compare_results(a: &MatchResult, b: &MatchResult) -> Ordering {
    a.is_rejected()
        .cmp(&b.is_rejected())
        .then_with(|| b.overall_score.total_cmp(&a.overall_score))
        .then_with(|| a.load_id.cmp(&b.load_id))
}

pub fn rank_results(results: &mut [MatchResult]) {
    results.sort_by(compare_results);
}
