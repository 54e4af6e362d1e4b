use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Commercial property listing supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub building_types: Vec<String>,
    #[serde(default)]
    pub tenancy: Option<String>,
    /// Raw size text from the listing, e.g. "1,000-45,000"
    #[serde(default)]
    pub square_footage: Option<String>,
    #[serde(default)]
    pub square_footage_min: Option<u32>,
    #[serde(default)]
    pub square_footage_max: Option<u32>,
    #[serde(default)]
    pub number_of_suites: Option<u32>,
    /// Raw rate text from the listing, e.g. "$25.50/SF/YR"
    #[serde(default)]
    pub rate_text: Option<String>,
    #[serde(default)]
    pub rate_per_sqft: Option<f64>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    /// Opaque pass/fail flags (ADA, fire code, flood zone, ...)
    #[serde(default)]
    pub compliance: BTreeMap<String, bool>,
}

impl Property {
    /// Bare property with only an id; every other field unknown
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            building_types: Vec::new(),
            tenancy: None,
            square_footage: None,
            square_footage_min: None,
            square_footage_max: None,
            number_of_suites: None,
            rate_text: None,
            rate_per_sqft: None,
            coordinates: None,
            compliance: BTreeMap::new(),
        }
    }

    /// Known size range, with a single bound serving as both
    pub fn size_range(&self) -> Option<(u32, u32)> {
        match (self.square_footage_min, self.square_footage_max) {
            (Some(min), Some(max)) => Some((min.min(max), min.max(max))),
            (Some(v), None) | (None, Some(v)) => Some((v, v)),
            (None, None) => None,
        }
    }
}

/// Location requirements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationCriteria {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub zip_codes: Vec<String>,
    #[serde(default)]
    pub center: Option<Coordinates>,
    #[serde(default)]
    pub radius_km: Option<f64>,
}

impl LocationCriteria {
    /// Center and radius, if both are present
    pub fn search_area(&self) -> Option<(Coordinates, f64)> {
        match (self.center, self.radius_km) {
            (Some(center), Some(radius)) => Some((center, radius)),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_none() && self.city.is_none() && self.search_area().is_none()
    }
}

/// Space requirements in square feet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceCriteria {
    #[serde(default)]
    pub min_square_feet: Option<u32>,
    #[serde(default)]
    pub max_square_feet: Option<u32>,
    #[serde(default)]
    pub preferred_square_feet: Option<u32>,
}

/// Requirements extracted from an RFP/RLP
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingCriteria {
    #[serde(default)]
    pub location: LocationCriteria,
    #[serde(default)]
    pub space: SpaceCriteria,
    #[serde(default)]
    pub building_type_preferences: Vec<String>,
    #[serde(default)]
    pub max_rate_per_sqft: Option<f64>,
    #[serde(default)]
    pub minimum_relevance_score: Option<u8>,
    /// Compliance flags that are deal-breakers in strict mode
    #[serde(default)]
    pub required_compliance: Vec<String>,
}

/// Qualitative match tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchLevel {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Scored dimensions of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Location,
    Size,
    BuildingType,
    Financial,
    Compliance,
}

impl Dimension {
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Location => "location",
            Dimension::Size => "size",
            Dimension::BuildingType => "building type",
            Dimension::Financial => "budget",
            Dimension::Compliance => "compliance",
        }
    }
}

/// Output of a single dimension scorer
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionScore {
    /// 0-100
    pub score: f64,
    pub notes: Vec<String>,
}

impl DimensionScore {
    pub fn new(score: f64, notes: Vec<String>) -> Self {
        Self {
            score: score.clamp(0.0, 100.0),
            notes,
        }
    }

    /// Neutral 50 for a dimension the data cannot inform
    pub fn neutral(note: impl Into<String>) -> Self {
        Self::new(50.0, vec![note.into()])
    }

    pub fn rounded(&self) -> u8 {
        self.score.round() as u8
    }
}

/// Scored, explained match of one property against the criteria
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub property_id: String,
    pub property: Property,
    pub overall_score: u8,
    pub match_level: MatchLevel,
    pub location_score: u8,
    pub size_score: u8,
    pub type_score: u8,
    pub financial_score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub match_reasons: Vec<String>,
    pub failure_reasons: Vec<String>,
}

/// Property excluded from ranking, with the reasons why
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedResult {
    pub property_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<u8>,
    pub reasons: Vec<String>,
}

/// Match counts per tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub excellent: usize,
    pub good: usize,
    pub fair: usize,
    pub poor: usize,
}

impl TierCounts {
    pub fn record(&mut self, level: MatchLevel) {
        match level {
            MatchLevel::Excellent => self.excellent += 1,
            MatchLevel::Good => self.good += 1,
            MatchLevel::Fair => self.fair += 1,
            MatchLevel::Poor => self.poor += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestMatch {
    pub property_id: String,
    pub overall_score: u8,
    pub match_level: MatchLevel,
}

/// Summary statistics of a ranking run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub total_candidates: usize,
    pub matched: usize,
    pub rejected: usize,
    pub filtered_out: usize,
    pub min_score: u8,
    pub tiers: TierCounts,
    pub average_score: f64,
    pub best_match: Option<BestMatch>,
}

/// Dimension weights for the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringWeights {
    pub location: f64,
    pub size: f64,
    #[serde(alias = "building_type")]
    pub building_type: f64,
    pub financial: f64,
    #[serde(default)]
    pub compliance: f64,
}

impl ScoringWeights {
    /// Web search weights: no compliance dimension
    pub fn permissive() -> Self {
        Self {
            location: 0.40,
            size: 0.30,
            building_type: 0.20,
            financial: 0.10,
            compliance: 0.0,
        }
    }

    /// Government matching weights
    pub fn strict() -> Self {
        Self {
            location: 0.35,
            size: 0.25,
            building_type: 0.15,
            financial: 0.10,
            compliance: 0.15,
        }
    }

    pub fn sum(&self) -> f64 {
        self.location + self.size + self.building_type + self.financial + self.compliance
    }

    pub fn weight(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Location => self.location,
            Dimension::Size => self.size,
            Dimension::BuildingType => self.building_type,
            Dimension::Financial => self.financial,
            Dimension::Compliance => self.compliance,
        }
    }

    /// All weights finite and non-negative, with a positive total
    pub fn is_valid(&self) -> bool {
        let parts = [
            self.location,
            self.size,
            self.building_type,
            self.financial,
            self.compliance,
        ];
        parts.iter().all(|w| w.is_finite() && *w >= 0.0) && self.sum() > 0.0
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::permissive()
    }
}

/// Lower bounds (inclusive) of each match tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub excellent: u8,
    pub good: u8,
    pub fair: u8,
}

impl TierThresholds {
    pub fn classify(&self, score: u8) -> MatchLevel {
        if score >= self.excellent {
            MatchLevel::Excellent
        } else if score >= self.good {
            MatchLevel::Good
        } else if score >= self.fair {
            MatchLevel::Fair
        } else {
            MatchLevel::Poor
        }
    }
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            excellent: 80,
            good: 65,
            fair: 45,
        }
    }
}

/// Point ledger of the location scorer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPoints {
    pub state_match: f64,
    pub city_match: f64,
    pub city_mismatch_penalty: f64,
    pub radius_bonus: f64,
    pub outside_radius_penalty: f64,
}

impl Default for LocationPoints {
    fn default() -> Self {
        Self {
            state_match: 40.0,
            city_match: 30.0,
            city_mismatch_penalty: 20.0,
            radius_bonus: 30.0,
            outside_radius_penalty: 10.0,
        }
    }
}

/// Rejection policy of a ranking run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Web search: below-threshold results are dropped silently
    #[default]
    Permissive,
    /// Government matching: compliance deal-breakers and below-threshold
    /// results are reported as rejected
    Strict,
}

/// Complete scoring configuration; every constant the engine uses
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub mode: MatchMode,
    pub weights: ScoringWeights,
    pub tiers: TierThresholds,
    pub location_points: LocationPoints,
    /// Dimension score at or above which a match reason is emitted
    pub reason_threshold: u8,
    /// Dimension score below which a failure reason is emitted
    pub failure_threshold: u8,
    /// Relative tolerance around the preferred size that still scores 100
    pub size_tolerance: f64,
    /// Default minimum overall score
    pub min_score: u8,
}

impl ScoringConfig {
    pub fn permissive() -> Self {
        Self {
            mode: MatchMode::Permissive,
            weights: ScoringWeights::permissive(),
            tiers: TierThresholds::default(),
            location_points: LocationPoints::default(),
            reason_threshold: 70,
            failure_threshold: 30,
            size_tolerance: 0.20,
            min_score: 30,
        }
    }

    pub fn strict() -> Self {
        Self {
            mode: MatchMode::Strict,
            weights: ScoringWeights::strict(),
            min_score: 70,
            ..Self::permissive()
        }
    }

    pub fn for_mode(mode: MatchMode) -> Self {
        match mode {
            MatchMode::Permissive => Self::permissive(),
            MatchMode::Strict => Self::strict(),
        }
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_min_score(mut self, min_score: u8) -> Self {
        self.min_score = min_score;
        self
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::permissive()
    }
}

/// Output of a ranking run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankOutcome {
    pub matches: Vec<MatchResult>,
    pub rejected: Vec<RejectedResult>,
    pub summary: MatchSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_lower_bounds_inclusive() {
        let tiers = TierThresholds::default();
        let cases = [
            (100, MatchLevel::Excellent),
            (80, MatchLevel::Excellent),
            (79, MatchLevel::Good),
            (65, MatchLevel::Good),
            (64, MatchLevel::Fair),
            (45, MatchLevel::Fair),
            (44, MatchLevel::Poor),
            (0, MatchLevel::Poor),
        ];

        for (score, expected) in cases {
            assert_eq!(tiers.classify(score), expected, "score {}", score);
        }
    }

    #[test]
    fn test_weights_presets_valid() {
        assert!((ScoringWeights::permissive().sum() - 1.0).abs() < 1e-9);
        assert!((ScoringWeights::strict().sum() - 1.0).abs() < 1e-9);
        assert!(ScoringWeights::strict().is_valid());
    }
}
