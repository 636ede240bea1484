use crate::core::fuzzy::{normalize, FuzzyMatcher};
use crate::models::lenient::positive;
use crate::models::{CarrierRequirements, Load, RateFlexibility, ToleranceBand, TruckType};

/// Score for body types the fuzzy comparison keeps apart but loaders accept interchangeably
const COMPATIBLE_BODY_SCORE: f64 = 0.9;

const COMPATIBLE_BODIES: &[(&str, &str)] = &[("closed", "container")];

/// Likelihood reported when the load already pays at or above the expected rate
const NO_NEGOTIATION_NEEDED: f64 = 0.05;

/// Which end of the load a location pair was compared against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteEnd {
    Origin,
    Destination,
}

/// Best-scoring (carrier location, load location) pair
#[derive(Debug, Clone, PartialEq)]
pub struct LocationMatch {
    pub score: f64,
    pub carrier_location: String,
    pub load_location: String,
    pub end: RouteEnd,
}

/// Credit for a deviation under a tolerance band (0-1)
///
/// Full credit up to `band.full`, zero from `band.zero`, linear in between.
#[inline]
pub fn band_score(deviation: f64, band: &ToleranceBand) -> f64 {
    if deviation <= band.full {
        1.0
    } else if deviation >= band.zero {
        0.0
    } else {
        1.0 - (deviation - band.full) / (band.zero - band.full)
    }
}

/// Truck type score, `None` when either side is unknown
pub fn truck_type_score(
    required: TruckType,
    load_truck_type: &str,
    fuzzy: &FuzzyMatcher,
) -> Option<f64> {
    let label = required.label()?;
    if normalize(load_truck_type).is_empty() {
        return None;
    }

    let fuzzy_score = fuzzy.similarity(label, load_truck_type);
    Some(fuzzy_score.max(body_compatibility(label, load_truck_type)))
}

fn body_compatibility(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    let has = |text: &str, token: &str| text.split(' ').any(|t| t == token);

    let compatible = COMPATIBLE_BODIES.iter().any(|(x, y)| {
        (has(&a, x) && has(&b, y)) || (has(&a, y) && has(&b, x))
    });

    if compatible { COMPATIBLE_BODY_SCORE } else { 0.0 }
}

/// Zero, negative and non-finite measures count as unknown
#[inline]
fn known(value: Option<f64>) -> Option<f64> {
    value.and_then(positive)
}

/// Tonnage score on relative deviation from the carrier's capacity
#[inline]
pub fn tonnage_score(required: Option<f64>, offered: Option<f64>, band: &ToleranceBand) -> Option<f64> {
    let (required, offered) = (known(required)?, known(offered)?);
    Some(band_score(((offered - required) / required).abs(), band))
}

/// Length score on absolute deviation in feet
#[inline]
pub fn length_score(required: Option<f64>, offered: Option<f64>, band: &ToleranceBand) -> Option<f64> {
    let (required, offered) = (known(required)?, known(offered)?);
    Some(band_score((offered - required).abs(), band))
}

/// Best pair among (current location x origin) and (preferred route x destination).
///
/// `None` when no pair has text on both sides.
pub fn location_score(
    requirements: &CarrierRequirements,
    load: &Load,
    fuzzy: &FuzzyMatcher,
) -> Option<LocationMatch> {
    let pickup = requirements
        .current_location
        .iter()
        .map(|loc| (loc, &load.origin, RouteEnd::Origin));
    let drops = requirements
        .preferred_routes
        .iter()
        .map(|route| (route, &load.destination, RouteEnd::Destination));

    pickup
        .chain(drops)
        .filter(|(carrier, load_side, _)| {
            !normalize(carrier).is_empty() && !normalize(load_side).is_empty()
        })
        .map(|(carrier, load_side, end)| LocationMatch {
            score: fuzzy.similarity(carrier, load_side),
            carrier_location: carrier.clone(),
            load_location: load_side.clone(),
            end,
        })
        .fold(None, |best: Option<LocationMatch>, candidate| match best {
            Some(current) if current.score >= candidate.score => Some(current),
            _ => Some(candidate),
        })
}

/// Price score: full when the load pays at least the expected rate, falling
/// linearly to zero at `floor` (fractional shortfall)
pub fn price_score(expected: Option<f64>, offered: Option<f64>, floor: f64) -> Option<f64> {
    let (expected, offered) = (known(expected)?, known(offered)?);
    if offered >= expected {
        return Some(1.0);
    }
    if floor <= 0.0 {
        return Some(0.0);
    }

    let shortfall = (expected - offered) / expected;
    Some((1.0 - shortfall / floor).clamp(0.0, 1.0))
}

/// Load price minus expected rate
#[inline]
pub fn price_gap(expected: Option<f64>, offered: Option<f64>) -> Option<f64> {
    Some(known(offered)? - known(expected)?)
}

/// Chance a negative gap closes through negotiation.
///
/// Non-increasing in the size of the shortfall, capped per flexibility, and
/// near zero when the load already pays enough.
pub fn negotiation_likelihood(
    gap: Option<f64>,
    expected: Option<f64>,
    flexibility: RateFlexibility,
    gap_limit: f64,
) -> Option<f64> {
    let (gap, expected) = (gap.filter(|g| g.is_finite())?, known(expected)?);
    if gap >= 0.0 {
        return Some(NO_NEGOTIATION_NEEDED);
    }

    let shortfall = -gap / expected;
    let decay = if gap_limit > 0.0 {
        (1.0 - shortfall / gap_limit).clamp(0.0, 1.0)
    } else {
        0.0
    };

    Some(flexibility.negotiation_ceiling() * decay)
}
