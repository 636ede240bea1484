use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use validator::Validate;

use crate::core::fuzzy::FuzzyMatcher;
use crate::models::lenient::optional_quantity;

/// Truck body category a carrier reports during the call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "Option<String>")]
pub enum TruckType {
    Open,
    Closed,
    Container,
    MultiAxle,
    SingleAxle,
    #[default]
    Unknown,
}

impl TruckType {
    /// Every variant that carries information, in label order
    pub const KNOWN: [TruckType; 5] = [
        TruckType::Open,
        TruckType::Closed,
        TruckType::Container,
        TruckType::MultiAxle,
        TruckType::SingleAxle,
    ];

    /// Text used when comparing against free-form load truck types
    pub fn label(&self) -> Option<&'static str> {
        match self {
            TruckType::Open => Some("open"),
            TruckType::Closed => Some("closed"),
            TruckType::Container => Some("container"),
            TruckType::MultiAxle => Some("multi axle"),
            TruckType::SingleAxle => Some("single axle"),
            TruckType::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        *self != TruckType::Unknown
    }

    /// Map free text ("Open truck", "multi_axle", "flatbed") onto a variant
    /// with the default acceptance threshold. Serde decoding goes through here.
    pub fn parse(text: &str) -> Self {
        Self::parse_with(text, &FuzzyMatcher::default())
    }

    /// Like [`parse`](Self::parse), but text must clear `matcher`'s threshold
    /// against some label or it is `Unknown`.
    pub fn parse_with(text: &str, matcher: &FuzzyMatcher) -> Self {
        let labels: Vec<&str> = Self::KNOWN.iter().filter_map(|t| t.label()).collect();

        matcher
            .find_best_match(text, &labels)
            .map(|found| Self::KNOWN[found.index])
            .unwrap_or(TruckType::Unknown)
    }
}

impl From<Option<String>> for TruckType {
    fn from(raw: Option<String>) -> Self {
        raw.map(|text| TruckType::parse(&text)).unwrap_or_default()
    }
}

impl fmt::Display for TruckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().unwrap_or("unknown"))
    }
}

/// How willing the carrier sounded about their quoted rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum RateFlexibility {
    Strict,
    Flexible,
    #[default]
    Unknown,
}

impl RateFlexibility {
    pub fn parse(text: &str) -> Self {
        let cleaned = text.trim().to_lowercase().replace(['-', '_'], " ");

        match cleaned.as_str() {
            "strict" | "fixed" | "firm" | "non negotiable" | "not negotiable" => {
                RateFlexibility::Strict
            }
            "flexible" | "flex" | "negotiable" | "open to negotiation" => {
                RateFlexibility::Flexible
            }
            _ => RateFlexibility::Unknown,
        }
    }

    /// Upper bound on negotiation likelihood when the load pays under the rate
    #[inline]
    pub fn negotiation_ceiling(&self) -> f64 {
        match self {
            RateFlexibility::Flexible => 0.9,
            RateFlexibility::Unknown => 0.5,
            RateFlexibility::Strict => 0.1,
        }
    }
}

impl From<Option<String>> for RateFlexibility {
    fn from(raw: Option<String>) -> Self {
        raw.map(|text| RateFlexibility::parse(&text)).unwrap_or_default()
    }
}

/// Structured carrier capacity extracted from a call transcript.
///
/// Every field is optional; a missing value means "unknown" and is never
/// read as zero or false.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CarrierRequirements {
    #[serde(default = "new_requirements_id")]
    pub id: String,
    #[serde(default)]
    pub truck_type: TruckType,
    /// Feet
    #[serde(default, deserialize_with = "optional_quantity")]
    pub truck_length: Option<f64>,
    /// Tonnes
    #[serde(default, deserialize_with = "optional_quantity")]
    pub tonnage: Option<f64>,
    #[serde(default)]
    pub current_location: Option<String>,
    #[serde(default)]
    pub preferred_routes: Vec<String>,
    #[serde(default, deserialize_with = "optional_quantity")]
    pub expected_rate: Option<f64>,
    #[serde(default)]
    pub rate_flexibility: RateFlexibility,
    #[serde(default)]
    pub available_immediately: Option<bool>,
    #[serde(default)]
    pub availability_constraints: Vec<String>,
    #[serde(default)]
    pub special_requirements: Vec<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Extraction certainty per field name, each within [0, 1]
    #[serde(default)]
    #[validate(custom(function = "validate_confidence_scores"))]
    pub confidence_scores: BTreeMap<String, f64>,
}

impl CarrierRequirements {
    pub fn has_truck_info(&self) -> bool {
        self.truck_type.is_known() || self.tonnage.is_some()
    }

    pub fn has_location_info(&self) -> bool {
        self.current_location
            .as_deref()
            .is_some_and(|loc| !loc.trim().is_empty())
            || self.preferred_routes.iter().any(|r| !r.trim().is_empty())
    }
}

fn new_requirements_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn validate_confidence_scores(
    scores: &BTreeMap<String, f64>,
) -> Result<(), validator::ValidationError> {
    for (field, score) in scores {
        if !(0.0..=1.0).contains(score) {
            let mut error = validator::ValidationError::new("confidence_range");
            error.message = Some(
                format!("confidence for '{}' must lie in [0, 1], got {}", field, score).into(),
            );
            return Err(error);
        }
    }
    Ok(())
}

/// Lifecycle state of a posted load; only `Available` loads are matchable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum LoadStatus {
    #[default]
    Available,
    Assigned,
    Completed,
    Cancelled,
}

impl TryFrom<String> for LoadStatus {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        match raw.trim().to_lowercase().as_str() {
            "available" | "open" => Ok(LoadStatus::Available),
            "assigned" => Ok(LoadStatus::Assigned),
            "completed" => Ok(LoadStatus::Completed),
            "cancelled" | "canceled" => Ok(LoadStatus::Cancelled),
            other => Err(format!("unknown load status '{}'", other)),
        }
    }
}

/// A freight job posted by a booking office
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Load {
    #[serde(default)]
    #[validate(length(min = 1, message = "load identifier is required"))]
    pub id: String,
    #[serde(default)]
    pub booking_office: Option<String>,
    #[serde(default, alias = "from_location")]
    pub origin: String,
    #[serde(default, alias = "to_location")]
    pub destination: String,
    #[serde(default)]
    pub truck_type: String,
    /// Feet
    #[serde(default, deserialize_with = "optional_quantity")]
    pub truck_length: Option<f64>,
    /// Tonnes
    #[serde(default, deserialize_with = "optional_quantity")]
    pub tonnage: Option<f64>,
    #[serde(default)]
    pub product: String,
    #[serde(default, deserialize_with = "optional_quantity")]
    pub price: Option<f64>,
    #[serde(default = "default_num_trucks")]
    #[validate(range(min = 1, message = "num_trucks must be positive"))]
    pub num_trucks: i64,
    #[serde(default)]
    pub eta: String,
    #[serde(default)]
    pub status: LoadStatus,
    #[serde(default)]
    pub assigned_to: Option<String>,
}

impl Load {
    /// An available single-truck load with no measures or price set
    pub fn new(
        id: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        truck_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            booking_office: None,
            origin: origin.into(),
            destination: destination.into(),
            truck_type: truck_type.into(),
            truck_length: None,
            tonnage: None,
            product: String::new(),
            price: None,
            num_trucks: default_num_trucks(),
            eta: String::new(),
            status: LoadStatus::Available,
            assigned_to: None,
        }
    }
}

fn default_num_trucks() -> i64 { 1 }

/// Scored dimension of a (requirements, load) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    TruckType,
    Tonnage,
    TruckLength,
    Location,
    Price,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::TruckType,
        Dimension::Tonnage,
        Dimension::TruckLength,
        Dimension::Location,
        Dimension::Price,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dimension::TruckType => "truck_type",
            Dimension::Tonnage => "tonnage",
            Dimension::TruckLength => "truck_length",
            Dimension::Location => "location",
            Dimension::Price => "price",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Next action suggested for a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    AutoApprove,
    HumanReview,
    CreateLead,
    Reject,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Recommendation::AutoApprove => "auto_approve",
            Recommendation::HumanReview => "human_review",
            Recommendation::CreateLead => "create_lead",
            Recommendation::Reject => "reject",
        };
        f.write_str(name)
    }
}

/// Scored, explained comparison of one load against one requirements record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub load_id: String,
    pub requirements_id: String,
    pub overall_score: f64,
    pub dimension_scores: BTreeMap<Dimension, f64>,
    pub mandatory_match: bool,
    pub recommendation: Recommendation,
    pub match_reasons: Vec<String>,
    pub mismatch_reasons: Vec<String>,
    /// Load price minus expected rate
    pub price_gap: Option<f64>,
    pub negotiation_likelihood: Option<f64>,
}

impl MatchResult {
    pub fn is_rejected(&self) -> bool {
        self.recommendation == Recommendation::Reject
    }

    pub fn score(&self, dimension: Dimension) -> f64 {
        self.dimension_scores.get(&dimension).copied().unwrap_or_default()
    }
}

/// Scoring weights, one per dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub truck_type: f64,
    pub tonnage: f64,
    pub truck_length: f64,
    pub location: f64,
    pub price: f64,
}

impl ScoringWeights {
    #[inline]
    pub fn weight(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::TruckType => self.truck_type,
            Dimension::Tonnage => self.tonnage,
            Dimension::TruckLength => self.truck_length,
            Dimension::Location => self.location,
            Dimension::Price => self.price,
        }
    }

    pub fn total(&self) -> f64 {
        Dimension::ALL.iter().map(|d| self.weight(*d).max(0.0)).sum()
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            truck_type: 0.30,
            tonnage: 0.20,
            truck_length: 0.15,
            location: 0.20,
            price: 0.15,
        }
    }
}

/// Score cut-offs for tiering, gating, fuzzy acceptance and explanations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub auto_approve: f64,
    pub human_review: f64,
    /// Truck-type scores below this fail the mandatory gate
    pub incompatibility: f64,
    pub fuzzy_acceptance: f64,
    /// Dimensions at or above this produce a match reason
    pub strong_match: f64,
    /// Known dimensions below this produce a mismatch reason
    pub weak_match: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            auto_approve: 0.85,
            human_review: 0.65,
            incompatibility: 0.40,
            fuzzy_acceptance: 0.60,
            strong_match: 0.80,
            weak_match: 0.40,
        }
    }
}

/// Deviation band: full credit up to `full`, none from `zero`, linear between
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceBand {
    pub full: f64,
    pub zero: f64,
}

/// Engine tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub weights: ScoringWeights,
    pub thresholds: Thresholds,
    /// Relative deviation of load tonnage from carrier tonnage
    pub tonnage_band: ToleranceBand,
    /// Absolute deviation in feet
    pub length_band: ToleranceBand,
    /// Fractional shortfall below the expected rate at which price scores zero
    pub price_floor: f64,
    /// Score assigned to a dimension with data missing on either side
    pub neutral_score: f64,
    /// Fractional shortfall at which negotiation likelihood reaches zero
    pub negotiation_gap_limit: f64,
    pub max_results: Option<usize>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            thresholds: Thresholds::default(),
            tonnage_band: ToleranceBand { full: 0.10, zero: 0.50 },
            length_band: ToleranceBand { full: 1.0, zero: 5.0 },
            price_floor: 0.30,
            neutral_score: 0.5,
            negotiation_gap_limit: 0.5,
            max_results: None,
        }
    }
}
