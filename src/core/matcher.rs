use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::core::{
    filters::{is_matchable, passes_mandatory_gate, rank_results},
    fuzzy::FuzzyMatcher,
    observer::{MatchObserver, MatchSummary, TracingObserver},
    recommendation::{classify, recommend_action, ActionRecommendation},
    scoring::{self, LocationMatch, RouteEnd},
    validation::{validate_loads, validate_requirements, MatchError},
};
use crate::models::{CarrierRequirements, Dimension, Load, MatchResult, MatchingConfig, TruckType};

/// Main matching engine: scores carrier requirements against a load catalog
///
/// # Pipeline Stages
/// 1. Boundary validation of requirements and loads
/// 2. Lifecycle filtering (only `available` loads)
/// 3. Per-dimension scoring and weighted aggregation
/// 4. Mandatory truck-type gate and tiering
/// 5. Ranking (rejected last, score descending, load id ascending)
///
/// The matcher keeps no state between calls and can be shared across threads.
#[derive(Clone)]
pub struct LoadMatcher {
    config: MatchingConfig,
    fuzzy: FuzzyMatcher,
    observer: Arc<dyn MatchObserver>,
}

impl LoadMatcher {
    pub fn new(config: MatchingConfig) -> Self {
        Self::with_observer(config, Arc::new(TracingObserver))
    }

    pub fn with_default_config() -> Self {
        Self::new(MatchingConfig::default())
    }

    pub fn with_observer(config: MatchingConfig, observer: Arc<dyn MatchObserver>) -> Self {
        let fuzzy = FuzzyMatcher::new(config.thresholds.fuzzy_acceptance);
        Self {
            config,
            fuzzy,
            observer,
        }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Score every available load against the requirements, best first.
    ///
    /// Non-available loads are left out entirely. Rejected loads are kept
    /// and always rank after every non-rejected one.
    ///
    /// # Errors
    /// Returns a [`MatchError`] when the requirements record, a load record
    /// or the collection as a whole is malformed.
    pub fn find_matching_loads(
        &self,
        requirements: &CarrierRequirements,
        loads: &[Load],
    ) -> Result<Vec<MatchResult>, MatchError> {
        if let Err(error) = validate_requirements(requirements).and_then(|_| validate_loads(loads)) {
            self.observer.validation_failed(&error);
            return Err(error);
        }

        let mut results: Vec<MatchResult> = loads
            .iter()
            .filter(|load| {
                let matchable = is_matchable(load);
                if !matchable {
                    self.observer.load_skipped(load);
                }
                matchable
            })
            .map(|load| {
                let result = self.score_load(requirements, load);
                self.observer.load_scored(&result);
                result
            })
            .collect();

        let evaluated = results.len();
        let rejected = results.iter().filter(|r| r.is_rejected()).count();

        rank_results(&mut results);

        if let Some(max_results) = self.config.max_results {
            results.truncate(max_results);
        }

        self.observer.matching_completed(&MatchSummary {
            requirements_id: &requirements.id,
            total_loads: loads.len(),
            evaluated,
            rejected,
            returned: results.len(),
        });

        Ok(results)
    }

    /// First result of [`find_matching_loads`](Self::find_matching_loads), `None` if there is none
    pub fn get_best_match(
        &self,
        requirements: &CarrierRequirements,
        loads: &[Load],
    ) -> Result<Option<MatchResult>, MatchError> {
        Ok(self.find_matching_loads(requirements, loads)?.into_iter().next())
    }

    /// Parse free-text truck type with the configured fuzzy acceptance
    /// threshold. Requirements decoded from JSON use the default threshold.
    pub fn parse_truck_type(&self, text: &str) -> TruckType {
        TruckType::parse_with(text, &self.fuzzy)
    }

    /// Call-level action for already ranked results
    pub fn recommend_action(
        &self,
        requirements: &CarrierRequirements,
        results: &[MatchResult],
    ) -> ActionRecommendation {
        recommend_action(requirements, results)
    }

    /// Score a single load without validation or status filtering
    pub fn score_load(&self, requirements: &CarrierRequirements, load: &Load) -> MatchResult {
        let config = &self.config;

        let truck_type =
            scoring::truck_type_score(requirements.truck_type, &load.truck_type, &self.fuzzy);
        let location = scoring::location_score(requirements, load, &self.fuzzy);

        let raw_scores = [
            (Dimension::TruckType, truck_type),
            (
                Dimension::Tonnage,
                scoring::tonnage_score(requirements.tonnage, load.tonnage, &config.tonnage_band),
            ),
            (
                Dimension::TruckLength,
                scoring::length_score(requirements.truck_length, load.truck_length, &config.length_band),
            ),
            (Dimension::Location, location.as_ref().map(|m| m.score)),
            (
                Dimension::Price,
                scoring::price_score(requirements.expected_rate, load.price, config.price_floor),
            ),
        ];

        let neutral = config.neutral_score.clamp(0.0, 1.0);
        let mut dimension_scores = BTreeMap::new();
        let mut weighted_sum = 0.0;

        for (dimension, score) in raw_scores {
            let score = score.unwrap_or(neutral).clamp(0.0, 1.0);
            weighted_sum += score * config.weights.weight(dimension).max(0.0);
            dimension_scores.insert(dimension, score);
        }

        let total_weight = config.weights.total();
        let overall_score = if total_weight > 0.0 {
            (weighted_sum / total_weight).clamp(0.0, 1.0)
        } else {
            neutral
        };

        let mandatory_match = passes_mandatory_gate(truck_type, config.thresholds.incompatibility);
        let recommendation = classify(overall_score, mandatory_match, &config.thresholds);

        let (match_reasons, mismatch_reasons) =
            self.explain(requirements, load, &raw_scores, location.as_ref());

        let price_gap = scoring::price_gap(requirements.expected_rate, load.price);
        let negotiation_likelihood = scoring::negotiation_likelihood(
            price_gap,
            requirements.expected_rate,
            requirements.rate_flexibility,
            config.negotiation_gap_limit,
        );

        MatchResult {
            load_id: load.id.clone(),
            requirements_id: requirements.id.clone(),
            overall_score,
            dimension_scores,
            mandatory_match,
            recommendation,
            match_reasons,
            mismatch_reasons,
            price_gap,
            negotiation_likelihood,
        }
    }

    /// Reasons for strong dimensions and mismatches for weak known ones
    fn explain(
        &self,
        requirements: &CarrierRequirements,
        load: &Load,
        raw_scores: &[(Dimension, Option<f64>)],
        location: Option<&LocationMatch>,
    ) -> (Vec<String>, Vec<String>) {
        let thresholds = &self.config.thresholds;
        let mut matches = Vec::new();
        let mut mismatches = Vec::new();

        for (dimension, score) in raw_scores {
            // Unknown dimensions explain nothing
            let Some(score) = score else { continue };

            if *score >= thresholds.strong_match {
                matches.push(match_reason(*dimension, requirements, load, location));
            } else if *score < thresholds.weak_match {
                mismatches.push(mismatch_reason(*dimension, requirements, load, location));
            }
        }

        (matches, mismatches)
    }
}

impl Default for LoadMatcher {
    fn default() -> Self {
        Self::with_default_config()
    }
}

impl fmt::Debug for LoadMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadMatcher")
            .field("config", &self.config)
            .field("fuzzy", &self.fuzzy)
            .finish_non_exhaustive()
    }
}

// Callers only reach these for known dimensions, so the measures are set.
fn match_reason(
    dimension: Dimension,
    requirements: &CarrierRequirements,
    load: &Load,
    location: Option<&LocationMatch>,
) -> String {
    match dimension {
        Dimension::TruckType => format!(
            "Truck type '{}' matches load requirement '{}'",
            requirements.truck_type, load.truck_type
        ),
        Dimension::Tonnage => format!(
            "Tonnage capacity {}T suits {}T load",
            fmt_measure(requirements.tonnage),
            fmt_measure(load.tonnage)
        ),
        Dimension::TruckLength => format!(
            "Truck length {} ft fits {} ft requirement",
            fmt_measure(requirements.truck_length),
            fmt_measure(load.truck_length)
        ),
        Dimension::Location => match location {
            Some(m) if m.end == RouteEnd::Origin => format!(
                "Carrier location '{}' matches pickup '{}'",
                m.carrier_location, m.load_location
            ),
            Some(m) => format!(
                "Preferred route '{}' matches drop '{}'",
                m.carrier_location, m.load_location
            ),
            None => format!("Route {} to {} matches carrier locations", load.origin, load.destination),
        },
        Dimension::Price => format!(
            "Load pays {} against expected rate {}",
            fmt_measure(load.price),
            fmt_measure(requirements.expected_rate)
        ),
    }
}

fn mismatch_reason(
    dimension: Dimension,
    requirements: &CarrierRequirements,
    load: &Load,
    location: Option<&LocationMatch>,
) -> String {
    match dimension {
        Dimension::TruckType => format!(
            "Truck type mismatch: carrier has '{}', load needs '{}'",
            requirements.truck_type, load.truck_type
        ),
        Dimension::Tonnage => format!(
            "Tonnage mismatch: carrier capacity {}T, load needs {}T",
            fmt_measure(requirements.tonnage),
            fmt_measure(load.tonnage)
        ),
        Dimension::TruckLength => format!(
            "Length mismatch: truck is {} ft, load needs {} ft",
            fmt_measure(requirements.truck_length),
            fmt_measure(load.truck_length)
        ),
        Dimension::Location => match location {
            Some(m) => format!(
                "Route mismatch: closest carrier location '{}' is far from '{}'",
                m.carrier_location, m.load_location
            ),
            None => format!("Route {} to {} does not match carrier locations", load.origin, load.destination),
        },
        Dimension::Price => format!(
            "Load price {} is below expected rate {}",
            fmt_measure(load.price),
            fmt_measure(requirements.expected_rate)
        ),
    }
}

fn fmt_measure(value: Option<f64>) -> String {
    value.map_or_else(|| "unknown".to_string(), |v| v.to_string())
}
