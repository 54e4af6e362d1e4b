// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod matcher;
pub mod normalize;
pub mod scoring;

pub use distance::{distance, haversine_distance, DistanceUnit};
pub use filters::{compliance_deal_breakers, meets_minimum_score, resolve_min_score};
pub use matcher::{aggregate, explain, Matcher, DEFAULT_PARALLEL_THRESHOLD};
pub use normalize::{normalize_criteria, normalize_property};
pub use scoring::{score_building_type, score_compliance, score_financial, score_location, score_size};
