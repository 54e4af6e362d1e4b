//! CRE Match - property-requirement matching and scoring engine
//!
//! This library scores commercial real estate listings against requirements
//! extracted from RFP/RLP documents. Each property gets location, size,
//! building-type, budget and (in strict mode) compliance scores, which are
//! combined into an overall score, a match tier and plain-language reasons.
//! Ranking is pure and deterministic: the same input always yields the same
//! output.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;

// Re-export commonly used types
pub use crate::core::{distance::{distance, haversine_distance, DistanceUnit}, Matcher};
pub use models::{
    MatchLevel, MatchMode, MatchResult, MatchingCriteria, Property, RankOutcome, RankRequest,
    RankResponse, ScoringConfig, ScoringWeights,
};
