//! Observability hooks injected into the matcher.
//!
//! The engine never touches process-wide logging state itself; it reports
//! through whatever [`MatchObserver`] it was built with.

use crate::core::validation::MatchError;
use crate::models::{Load, MatchResult};

/// Per-call totals reported once matching finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSummary<'a> {
    pub requirements_id: &'a str,
    pub total_loads: usize,
    pub evaluated: usize,
    pub rejected: usize,
    pub returned: usize,
}

pub trait MatchObserver: Send + Sync {
    fn load_scored(&self, _result: &MatchResult) {}

    /// A load excluded before scoring because it is not available
    fn load_skipped(&self, _load: &Load) {}

    fn matching_completed(&self, _summary: &MatchSummary<'_>) {}

    fn validation_failed(&self, _error: &MatchError) {}
}

/// Forwards engine events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl MatchObserver for TracingObserver {
    fn load_scored(&self, result: &MatchResult) {
        tracing::debug!(
            load_id = %result.load_id,
            score = result.overall_score,
            recommendation = %result.recommendation,
            mandatory_match = result.mandatory_match,
            "Scored load"
        );
    }

    fn load_skipped(&self, load: &Load) {
        tracing::trace!(load_id = %load.id, status = ?load.status, "Skipping unavailable load");
    }

    fn matching_completed(&self, summary: &MatchSummary<'_>) {
        tracing::info!(
            requirements_id = summary.requirements_id,
            total_loads = summary.total_loads,
            evaluated = summary.evaluated,
            rejected = summary.rejected,
            returned = summary.returned,
            "Matching completed"
        );
    }

    fn validation_failed(&self, error: &MatchError) {
        tracing::warn!("Rejected matching input: {}", error);
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl MatchObserver for NoopObserver {}
