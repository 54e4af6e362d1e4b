use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::models::domain::{MatchMode, MatchingCriteria, Property, ScoringWeights};

/// Errors raised while checking a request before it reaches the engine
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Weights must be finite, non-negative and not all zero")]
    InvalidWeights,

    #[error("Invalid criteria: {0}")]
    InvalidCriteria(String),

    #[error("Too many candidates: {count} exceeds the limit of {max}")]
    TooManyCandidates { count: usize, max: usize },
}

/// Request to rank a candidate set
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RankRequest {
    #[serde(default)]
    pub candidates: Vec<Property>,
    #[serde(default)]
    pub criteria: MatchingCriteria,
    #[validate(range(max = 100))]
    #[serde(default)]
    pub min_score: Option<u8>,
    #[serde(default)]
    pub mode: Option<MatchMode>,
    #[serde(default)]
    pub weights: Option<ScoringWeights>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<usize>,
}

impl RankRequest {
    /// Run field validation plus the cross-field checks
    pub fn check(&self, max_candidates: usize) -> Result<(), RequestError> {
        self.validate()?;

        if self.candidates.len() > max_candidates {
            return Err(RequestError::TooManyCandidates {
                count: self.candidates.len(),
                max: max_candidates,
            });
        }

        check_weights(self.weights.as_ref())?;
        check_criteria(&self.criteria)
    }
}

/// Request to score a single property, without ranking gates
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    #[validate(custom(function = "validate_property_id"))]
    pub property: Property,
    #[serde(default)]
    pub criteria: MatchingCriteria,
    #[serde(default)]
    pub mode: Option<MatchMode>,
    #[serde(default)]
    pub weights: Option<ScoringWeights>,
}

impl ScoreRequest {
    pub fn check(&self) -> Result<(), RequestError> {
        self.validate()?;
        check_weights(self.weights.as_ref())?;
        check_criteria(&self.criteria)
    }
}

fn validate_property_id(property: &Property) -> Result<(), validator::ValidationError> {
    if property.id.trim().is_empty() {
        return Err(validator::ValidationError::new("empty_property_id"));
    }
    Ok(())
}

fn check_weights(weights: Option<&ScoringWeights>) -> Result<(), RequestError> {
    match weights {
        Some(w) if !w.is_valid() => Err(RequestError::InvalidWeights),
        _ => Ok(()),
    }
}

/// Reject criteria the engine cannot interpret
pub fn check_criteria(criteria: &MatchingCriteria) -> Result<(), RequestError> {
    if let Some(rate) = criteria.max_rate_per_sqft {
        if !rate.is_finite() || rate < 0.0 {
            return Err(RequestError::InvalidCriteria(format!(
                "maxRatePerSqft must be a non-negative number, got {}",
                rate
            )));
        }
    }

    if let Some(radius) = criteria.location.radius_km {
        if !radius.is_finite() || radius < 0.0 {
            return Err(RequestError::InvalidCriteria(format!(
                "radiusKm must be a non-negative number, got {}",
                radius
            )));
        }
    }

    if let Some(center) = criteria.location.center {
        if !crate::core::normalize::validate_coordinates(center.lat, center.lng) {
            return Err(RequestError::InvalidCriteria(format!(
                "center ({}, {}) is not a valid coordinate",
                center.lat, center.lng
            )));
        }
    }

    if let Some(score) = criteria.minimum_relevance_score {
        if score > 100 {
            return Err(RequestError::InvalidCriteria(format!(
                "minimumRelevanceScore must be at most 100, got {}",
                score
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::Coordinates;

    fn request_with(candidates: usize) -> RankRequest {
        RankRequest {
            candidates: (0..candidates).map(|i| Property::new(i.to_string())).collect(),
            criteria: MatchingCriteria::default(),
            min_score: None,
            mode: None,
            weights: None,
            limit: None,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(request_with(3).check(10).is_ok());
    }

    #[test]
    fn test_too_many_candidates() {
        let err = request_with(11).check(10).unwrap_err();
        assert!(matches!(err, RequestError::TooManyCandidates { count: 11, max: 10 }));
    }

    #[test]
    fn test_min_score_out_of_range() {
        let mut request = request_with(1);
        request.min_score = Some(101);
        assert!(matches!(request.check(10), Err(RequestError::Validation(_))));
    }

    #[test]
    fn test_zero_weights_rejected() {
        let mut request = request_with(1);
        request.weights = Some(ScoringWeights {
            location: 0.0,
            size: 0.0,
            building_type: 0.0,
            financial: 0.0,
            compliance: 0.0,
        });
        assert!(matches!(request.check(10), Err(RequestError::InvalidWeights)));
    }

    #[test]
    fn test_negative_budget_rejected() {
        let mut request = request_with(1);
        request.criteria.max_rate_per_sqft = Some(-5.0);
        assert!(matches!(request.check(10), Err(RequestError::InvalidCriteria(_))));
    }

    #[test]
    fn test_invalid_center_rejected() {
        let mut request = request_with(1);
        request.criteria.location.center = Some(Coordinates::new(120.0, 0.0));
        assert!(matches!(request.check(10), Err(RequestError::InvalidCriteria(_))));
    }

    #[test]
    fn test_score_request_requires_property_id() {
        let request = ScoreRequest {
            property: Property::new("  "),
            criteria: MatchingCriteria::default(),
            mode: None,
            weights: None,
        };
        assert!(matches!(request.check(), Err(RequestError::Validation(_))));
    }
}
