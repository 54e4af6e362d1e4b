// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BestMatch, Coordinates, Dimension, DimensionScore, LocationCriteria, LocationPoints,
    MatchLevel, MatchMode, MatchResult, MatchSummary, MatchingCriteria, Property, RankOutcome,
    RejectedResult, ScoringConfig, ScoringWeights, SpaceCriteria, TierCounts, TierThresholds,
};
pub use requests::{RankRequest, RequestError, ScoreRequest};
pub use responses::{ErrorResponse, HealthResponse, RankResponse, ScoreResponse};
