// Integration tests for Freight Match

use std::sync::{Arc, Mutex};

use freight_match::core::{ActionRecommendation, LoadMatcher, MatchError, MatchObserver, MatchSummary};
use freight_match::models::{
    CarrierRequirements, Dimension, Load, LoadStatus, MatchingConfig, RateFlexibility,
    Recommendation, TruckType,
};

fn sample_loads() -> Vec<Load> {
    serde_json::from_str(include_str!("fixtures/sample_loads.json")).unwrap()
}

/// Open truck, 8 tonnes, 19 ft, waiting at Jigani, no rate quoted
fn jigani_requirements() -> CarrierRequirements {
    CarrierRequirements {
        id: "call_001".to_string(),
        truck_type: TruckType::Open,
        tonnage: Some(8.0),
        truck_length: Some(19.0),
        current_location: Some("Jigani".to_string()),
        ..Default::default()
    }
}

fn create_test_load(id: usize) -> Load {
    let origins = ["Jigani", "Tumakuru", "Mumbai", "Bhiwandi", "Chennai"];
    let destinations = ["Nizampur", "Madurai", "Coimbatore", "Beed", "Pune"];
    let truck_types = ["open", "container", "closed body", "multi axle", "Open truck"];

    let mut load = Load::new(
        format!("load_{:04}", id),
        origins[id % origins.len()],
        destinations[(id / 2) % destinations.len()],
        truck_types[(id / 3) % truck_types.len()],
    );
    load.tonnage = (id % 4 != 0).then(|| 4.0 + (id % 20) as f64);
    load.truck_length = (id % 5 != 0).then(|| 10.0 + (id % 15) as f64);
    load.price = (id % 3 != 0).then(|| 15000.0 + (id % 10) as f64 * 1000.0);
    // Measures that never come out of JSON decoding but can be set directly
    match id % 11 {
        1 => load.tonnage = Some(0.0),
        3 => load.truck_length = Some(-4.0),
        5 => load.price = Some(f64::NAN),
        7 => load.tonnage = Some(f64::INFINITY),
        9 => load.price = Some(-100.0),
        _ => {}
    }
    load.status = match id % 7 {
        0 => LoadStatus::Assigned,
        6 => LoadStatus::Cancelled,
        _ => LoadStatus::Available,
    };
    load
}

fn create_test_loads(count: usize) -> Vec<Load> {
    (0..count).map(create_test_load).collect()
}

#[test]
fn test_fixture_parses_source_format() {
    let loads = sample_loads();

    assert_eq!(loads.len(), 4);
    assert_eq!(loads[0].origin, "Jigani");
    assert_eq!(loads[0].tonnage, Some(6.0));
    assert_eq!(loads[1].truck_length, Some(20.0));
    assert_eq!(loads[2].status, LoadStatus::Assigned);
    assert_eq!(loads[3].tonnage, None);
    assert_eq!(loads[3].truck_length, None);
}

#[test]
fn test_jigani_scenario() {
    let matcher = LoadMatcher::with_default_config();
    let results = matcher
        .find_matching_loads(&jigani_requirements(), &sample_loads())
        .unwrap();

    // load_003 is assigned and never scored
    let ids: Vec<&str> = results.iter().map(|r| r.load_id.as_str()).collect();
    assert_eq!(ids, vec!["load_001", "load_004", "load_002"]);

    let first = &results[0];
    assert_eq!(first.score(Dimension::TruckType), 1.0);
    assert_eq!(first.score(Dimension::Location), 1.0);
    assert_eq!(first.score(Dimension::TruckLength), 0.0);
    assert!((first.score(Dimension::Tonnage) - 0.625).abs() < 1e-9);
    assert!((first.overall_score - 0.70).abs() < 1e-9);
    assert!(first.mandatory_match);
    assert_eq!(first.recommendation, Recommendation::HumanReview);
    assert!(!first.match_reasons.is_empty());
    assert!(first.mismatch_reasons.iter().any(|r| r.contains("Length")));

    let container = &results[2];
    assert!(!container.mandatory_match);
    assert_eq!(container.recommendation, Recommendation::Reject);
    assert!(container.score(Dimension::TruckType) < 0.4);
    assert!(container.mismatch_reasons.iter().any(|r| r.contains("Truck type")));
}

#[test]
fn test_incompatible_truck_type_is_rejected_despite_perfect_fit() {
    let matcher = LoadMatcher::with_default_config();
    let requirements = CarrierRequirements {
        truck_type: TruckType::parse("Open truck"),
        tonnage: Some(10.0),
        truck_length: Some(20.0),
        current_location: Some("Jigani".to_string()),
        expected_rate: Some(20000.0),
        ..jigani_requirements()
    };

    let mut load = Load::new("L1", "Jigani", "Nizampur", "Closed container");
    load.tonnage = Some(10.0);
    load.truck_length = Some(20.0);
    load.price = Some(30000.0);

    let result = matcher.get_best_match(&requirements, &[load]).unwrap().unwrap();
    assert!(result.score(Dimension::TruckType) < 0.4);
    assert_eq!(result.score(Dimension::Tonnage), 1.0);
    assert_eq!(result.score(Dimension::Price), 1.0);
    assert!(!result.mandatory_match);
    assert_eq!(result.recommendation, Recommendation::Reject);
}

#[test]
fn test_flatbed_call_never_approves_container_load() {
    let matcher = LoadMatcher::with_default_config();
    let requirements: CarrierRequirements = serde_json::from_str(
        r#"{"truck_type": "flatbed", "tonnage": 10, "truck_length": 20,
            "current_location": "Jigani", "expected_rate": 20000}"#,
    )
    .unwrap();
    assert_eq!(requirements.truck_type, TruckType::Open);

    let mut load = Load::new("L1", "Jigani", "Nizampur", "refrigerated container");
    load.tonnage = Some(10.0);
    load.truck_length = Some(20.0);
    load.price = Some(30000.0);

    let result = matcher.get_best_match(&requirements, &[load]).unwrap().unwrap();
    assert!(!result.mandatory_match);
    assert_eq!(result.recommendation, Recommendation::Reject);
}

#[test]
fn test_unknown_price_is_neutral() {
    let matcher = LoadMatcher::with_default_config();
    let results = matcher
        .find_matching_loads(&jigani_requirements(), &sample_loads())
        .unwrap();

    for result in &results {
        assert_eq!(result.score(Dimension::Price), 0.5);
        assert_eq!(result.price_gap, None);
        assert_eq!(result.negotiation_likelihood, None);
        assert!(result
            .match_reasons
            .iter()
            .chain(&result.mismatch_reasons)
            .all(|r| !r.contains("price") && !r.contains("pays")));
    }
}

#[test]
fn test_unknown_measures_are_neutral() {
    let matcher = LoadMatcher::with_default_config();
    let results = matcher
        .find_matching_loads(&jigani_requirements(), &sample_loads())
        .unwrap();

    let mumbai = results.iter().find(|r| r.load_id == "load_004").unwrap();
    assert_eq!(mumbai.score(Dimension::Tonnage), 0.5);
    assert_eq!(mumbai.score(Dimension::TruckLength), 0.5);
    assert_eq!(mumbai.recommendation, Recommendation::CreateLead);
}

#[test]
fn test_price_gap_and_negotiation() {
    let matcher = LoadMatcher::with_default_config();
    let mut requirements = jigani_requirements();
    requirements.expected_rate = Some(22000.0);
    requirements.rate_flexibility = RateFlexibility::Flexible;

    let results = matcher.find_matching_loads(&requirements, &sample_loads()).unwrap();

    let pays_more = results.iter().find(|r| r.load_id == "load_001").unwrap();
    assert_eq!(pays_more.price_gap, Some(3000.0));
    assert_eq!(pays_more.score(Dimension::Price), 1.0);

    let pays_less = results.iter().find(|r| r.load_id == "load_004").unwrap();
    assert_eq!(pays_less.price_gap, Some(-4000.0));
    let likelihood = pays_less.negotiation_likelihood.unwrap();
    assert!(likelihood > 0.0 && likelihood < 0.9);
    assert!(pays_less.negotiation_likelihood > pays_more.negotiation_likelihood);
}

#[test]
fn test_scores_stay_in_unit_range() {
    let matcher = LoadMatcher::with_default_config();
    let loads = create_test_loads(200);

    let requirement_sets = [
        CarrierRequirements::default(),
        jigani_requirements(),
        CarrierRequirements {
            truck_type: TruckType::Container,
            tonnage: Some(30.0),
            truck_length: Some(32.0),
            preferred_routes: vec!["Pune".to_string(), "Coimbatore".to_string()],
            expected_rate: Some(40000.0),
            ..Default::default()
        },
        CarrierRequirements {
            tonnage: Some(0.0),
            truck_length: Some(f64::NAN),
            expected_rate: Some(-5000.0),
            ..jigani_requirements()
        },
        CarrierRequirements {
            tonnage: Some(f64::NEG_INFINITY),
            truck_length: Some(0.0),
            expected_rate: Some(f64::NAN),
            rate_flexibility: RateFlexibility::Flexible,
            ..jigani_requirements()
        },
    ];

    for requirements in &requirement_sets {
        for result in matcher.find_matching_loads(requirements, &loads).unwrap() {
            assert!((0.0..=1.0).contains(&result.overall_score));
            assert_eq!(result.dimension_scores.len(), Dimension::ALL.len());
            for score in result.dimension_scores.values() {
                assert!((0.0..=1.0).contains(score));
            }
            if let Some(likelihood) = result.negotiation_likelihood {
                assert!((0.0..=1.0).contains(&likelihood));
            }
            if let Some(gap) = result.price_gap {
                assert!(gap.is_finite());
            }
        }
    }
}

#[test]
fn test_only_available_loads_are_returned() {
    let matcher = LoadMatcher::with_default_config();
    let loads = create_test_loads(100);
    let results = matcher.find_matching_loads(&jigani_requirements(), &loads).unwrap();

    let available = loads.iter().filter(|l| l.status == LoadStatus::Available).count();
    assert_eq!(results.len(), available);

    for result in &results {
        let load = loads.iter().find(|l| l.id == result.load_id).unwrap();
        assert_eq!(load.status, LoadStatus::Available);
    }
}

#[test]
fn test_results_are_ranked() {
    let matcher = LoadMatcher::with_default_config();
    let results = matcher
        .find_matching_loads(&jigani_requirements(), &create_test_loads(150))
        .unwrap();

    let first_rejected = results
        .iter()
        .position(|r| r.is_rejected())
        .unwrap_or(results.len());
    assert!(results[first_rejected..].iter().all(|r| r.is_rejected()));

    for pair in results.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if a.is_rejected() == b.is_rejected() {
            assert!(
                a.overall_score > b.overall_score
                    || (a.overall_score == b.overall_score && a.load_id < b.load_id)
            );
        }
    }
}

#[test]
fn test_matching_is_deterministic() {
    let matcher = LoadMatcher::with_default_config();
    let requirements = jigani_requirements();
    let loads = create_test_loads(80);

    let first = matcher.find_matching_loads(&requirements, &loads).unwrap();
    let second = matcher.find_matching_loads(&requirements, &loads).unwrap();
    assert_eq!(first, second);

    let mut reversed = loads.clone();
    reversed.reverse();
    let third = matcher.find_matching_loads(&requirements, &reversed).unwrap();
    assert_eq!(first, third);
}

#[test]
fn test_best_match_is_first_result() {
    let matcher = LoadMatcher::with_default_config();
    let requirements = jigani_requirements();
    let loads = create_test_loads(60);

    let results = matcher.find_matching_loads(&requirements, &loads).unwrap();
    let best = matcher.get_best_match(&requirements, &loads).unwrap();
    assert_eq!(best.as_ref(), results.first());

    assert_eq!(matcher.get_best_match(&requirements, &[]).unwrap(), None);
}

#[test]
fn test_empty_requirements_score_everything_neutral() {
    let matcher = LoadMatcher::with_default_config();
    let results = matcher
        .find_matching_loads(&CarrierRequirements::default(), &sample_loads())
        .unwrap();

    assert_eq!(results.len(), 3);
    for result in &results {
        assert!((result.overall_score - 0.5).abs() < 1e-9);
        assert!(result.mandatory_match);
        assert!(result.match_reasons.is_empty());
        assert!(result.mismatch_reasons.is_empty());
    }

    // Equal scores fall back to load id
    let ids: Vec<&str> = results.iter().map(|r| r.load_id.as_str()).collect();
    assert_eq!(ids, vec!["load_001", "load_002", "load_004"]);
}

#[test]
fn test_duplicate_load_ids_are_rejected() {
    let matcher = LoadMatcher::with_default_config();
    let loads = vec![
        Load::new("L1", "Jigani", "Nizampur", "open"),
        Load::new("L1", "Jigani", "Beed", "open"),
    ];

    let err = matcher.find_matching_loads(&jigani_requirements(), &loads).unwrap_err();
    assert!(matches!(err, MatchError::InvalidLoadCollection(_)));
}

#[test]
fn test_invalid_confidence_is_rejected() {
    let matcher = LoadMatcher::with_default_config();
    let mut requirements = jigani_requirements();
    requirements.confidence_scores.insert("tonnage".to_string(), 1.4);

    let err = matcher.find_matching_loads(&requirements, &sample_loads()).unwrap_err();
    assert!(matches!(err, MatchError::InvalidRequirements(_)));
}

#[test]
fn test_max_results_truncates() {
    let config = MatchingConfig {
        max_results: Some(2),
        ..Default::default()
    };
    let matcher = LoadMatcher::new(config);
    let results = matcher
        .find_matching_loads(&jigani_requirements(), &sample_loads())
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].load_id, "load_001");
}

#[test]
fn test_recommend_action_for_calls() {
    let matcher = LoadMatcher::with_default_config();
    let requirements = jigani_requirements();

    let results = matcher.find_matching_loads(&requirements, &sample_loads()).unwrap();
    let action = matcher.recommend_action(&requirements, &results);
    assert_eq!(action.action, Recommendation::HumanReview);
    assert_eq!(action.load_id.as_deref(), Some("load_001"));

    // Nothing open, but the call captured details worth a lead
    let lead = matcher.recommend_action(&requirements, &[]);
    assert_eq!(lead.action, Recommendation::CreateLead);
    assert_eq!(lead.load_id, None);

    let empty_call: ActionRecommendation =
        matcher.recommend_action(&CarrierRequirements::default(), &[]);
    assert_eq!(empty_call.action, Recommendation::Reject);
}

#[derive(Default)]
struct RecordingObserver {
    summaries: Mutex<Vec<(usize, usize, usize, usize)>>,
}

impl MatchObserver for RecordingObserver {
    fn matching_completed(&self, summary: &MatchSummary<'_>) {
        self.summaries.lock().unwrap().push((
            summary.total_loads,
            summary.evaluated,
            summary.rejected,
            summary.returned,
        ));
    }
}

#[test]
fn test_observer_receives_summary() {
    let observer = Arc::new(RecordingObserver::default());
    let matcher = LoadMatcher::with_observer(MatchingConfig::default(), observer.clone());

    matcher
        .find_matching_loads(&jigani_requirements(), &sample_loads())
        .unwrap();

    let summaries = observer.summaries.lock().unwrap();
    assert_eq!(summaries.as_slice(), &[(4, 3, 1, 3)]);
}
