// Core algorithm exports
pub mod filters;
pub mod fuzzy;
pub mod matcher;
pub mod observer;
pub mod recommendation;
pub mod scoring;
pub mod validation;

pub use filters::{compare_results, is_matchable, passes_mandatory_gate, rank_results};
pub use fuzzy::{normalize, similarity, FuzzyMatch, FuzzyMatcher, DEFAULT_ACCEPTANCE_THRESHOLD};
pub use matcher::LoadMatcher;
pub use observer::{MatchObserver, MatchSummary, NoopObserver, TracingObserver};
pub use recommendation::{classify, recommend_action, ActionRecommendation};
pub use scoring::{LocationMatch, RouteEnd};
pub use validation::{validate_loads, validate_requirements, MatchError};
