use rayon::prelude::*;

use crate::core::{
    distance::{distance, DistanceUnit},
    filters::{compliance_deal_breakers, meets_minimum_score, resolve_min_score},
    normalize::{normalize_criteria, normalize_property},
    scoring::{score_building_type, score_compliance, score_financial, score_location, score_size},
};
use crate::models::{
    BestMatch, Dimension, DimensionScore, MatchMode, MatchResult, MatchSummary, MatchingCriteria,
    Property, RankOutcome, RejectedResult, ScoringConfig, ScoringWeights, TierCounts,
};

/// Candidate count at which scoring moves onto the rayon pool
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// Outcome of evaluating one candidate under the rejection policy
#[derive(Debug)]
enum Verdict {
    Matched(MatchResult),
    Rejected(RejectedResult),
    FilteredOut,
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Normalize criteria and each candidate
/// 2. Strict mode: reject candidates failing a required compliance flag
/// 3. Score the dimensions and aggregate them with the configured weights
/// 4. Apply the minimum relevance score (dropped, or rejected in strict mode)
/// 5. Stable sort by overall score and summarize
#[derive(Debug, Clone)]
pub struct Matcher {
    config: ScoringConfig,
    parallel_threshold: usize,
}

impl Matcher {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    pub fn permissive() -> Self {
        Self::new(ScoringConfig::permissive())
    }

    pub fn strict() -> Self {
        Self::new(ScoringConfig::strict())
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold.max(1);
        self
    }

    /// Same matcher with the dimension weights replaced
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.config.weights = weights;
        self
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn mode(&self) -> MatchMode {
        self.config.mode
    }

    /// Score a single property against the criteria
    ///
    /// No gates are applied: a property failing a required compliance flag
    /// or scoring below the minimum still gets a full result.
    pub fn score_property(&self, property: &Property, criteria: &MatchingCriteria) -> MatchResult {
        let criteria = normalize_criteria(criteria);
        self.score_normalized(normalize_property(property), &criteria)
    }

    /// Rank candidates against the criteria
    ///
    /// `min_score` falls back to the criteria's `minimumRelevanceScore`, then
    /// to the configured default for the mode.
    pub fn rank(
        &self,
        candidates: &[Property],
        criteria: &MatchingCriteria,
        min_score: Option<u8>,
    ) -> RankOutcome {
        self.rank_with_limit(candidates, criteria, min_score, None)
    }

    /// Rank candidates and keep at most `limit` matches
    ///
    /// The summary always describes the full candidate set.
    pub fn rank_with_limit(
        &self,
        candidates: &[Property],
        criteria: &MatchingCriteria,
        min_score: Option<u8>,
        limit: Option<usize>,
    ) -> RankOutcome {
        let criteria = normalize_criteria(criteria);
        let min_score = resolve_min_score(min_score, &criteria, self.config.min_score);

        let evaluate = |property: &Property| self.evaluate(property, &criteria, min_score);
        let verdicts: Vec<Verdict> = if candidates.len() >= self.parallel_threshold {
            candidates.par_iter().map(evaluate).collect()
        } else {
            candidates.iter().map(evaluate).collect()
        };

        let mut matches = Vec::new();
        let mut rejected = Vec::new();
        let mut filtered_out = 0;
        for verdict in verdicts {
            match verdict {
                Verdict::Matched(result) => matches.push(result),
                Verdict::Rejected(result) => rejected.push(result),
                Verdict::FilteredOut => filtered_out += 1,
            }
        }

        // Stable: equal scores keep input order
        matches.sort_by(|a, b| b.overall_score.cmp(&a.overall_score));

        let summary = summarize(candidates.len(), &matches, rejected.len(), filtered_out, min_score);

        tracing::debug!(
            "Ranked {} candidates ({:?}): {} matched, {} rejected, {} below {}",
            candidates.len(),
            self.config.mode,
            summary.matched,
            summary.rejected,
            summary.filtered_out,
            min_score
        );

        if let Some(limit) = limit {
            matches.truncate(limit);
        }

        RankOutcome {
            matches,
            rejected,
            summary,
        }
    }

    fn evaluate(&self, property: &Property, criteria: &MatchingCriteria, min_score: u8) -> Verdict {
        let property = normalize_property(property);

        if self.config.mode == MatchMode::Strict {
            let deal_breakers = compliance_deal_breakers(&property, criteria);
            if !deal_breakers.is_empty() {
                return Verdict::Rejected(RejectedResult {
                    property_id: property.id,
                    overall_score: None,
                    reasons: deal_breakers,
                });
            }
        }

        let result = self.score_normalized(property, criteria);
        if meets_minimum_score(result.overall_score, min_score) {
            return Verdict::Matched(result);
        }

        match self.config.mode {
            MatchMode::Permissive => Verdict::FilteredOut,
            MatchMode::Strict => {
                let mut reasons = vec![format!(
                    "Overall score {} is below the minimum relevance score {}",
                    result.overall_score, min_score
                )];
                reasons.extend(result.failure_reasons);
                Verdict::Rejected(RejectedResult {
                    property_id: result.property_id,
                    overall_score: Some(result.overall_score),
                    reasons,
                })
            }
        }
    }

    fn score_normalized(&self, property: Property, criteria: &MatchingCriteria) -> MatchResult {
        let config = &self.config;
        let weights = config.weights;

        let location = score_location(&property, &criteria.location, &config.location_points);
        let size = score_size(&property, &criteria.space, config.size_tolerance);
        let building_type = score_building_type(&property, &criteria.building_type_preferences);
        let financial = score_financial(property.rate_per_sqft, criteria.max_rate_per_sqft);
        let compliance = (weights.compliance > 0.0)
            .then(|| score_compliance(&property, &criteria.required_compliance));

        let mut dimensions = vec![
            (Dimension::Location, &location),
            (Dimension::Size, &size),
            (Dimension::BuildingType, &building_type),
            (Dimension::Financial, &financial),
        ];
        if let Some(compliance) = &compliance {
            dimensions.push((Dimension::Compliance, compliance));
        }

        let overall_score = aggregate(&dimensions, &weights);
        let (match_reasons, failure_reasons) = explain(
            &dimensions,
            &weights,
            config.reason_threshold,
            config.failure_threshold,
        );

        let distance_km = criteria
            .location
            .center
            .zip(property.coordinates)
            .map(|(center, coords)| distance(center, coords, DistanceUnit::Km));

        MatchResult {
            property_id: property.id.clone(),
            overall_score,
            match_level: config.tiers.classify(overall_score),
            location_score: location.rounded(),
            size_score: size.rounded(),
            type_score: building_type.rounded(),
            financial_score: financial.rounded(),
            compliance_score: compliance.as_ref().map(DimensionScore::rounded),
            distance_km,
            match_reasons,
            failure_reasons,
            property,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::permissive()
    }
}

/// Weighted mean of the dimension scores, rounded to an integer in [0, 100]
///
/// Weights are divided by their total, so any non-negative weight vector
/// keeps the result in range.
pub fn aggregate(dimensions: &[(Dimension, &DimensionScore)], weights: &ScoringWeights) -> u8 {
    let total_weight: f64 = dimensions.iter().map(|(d, _)| weights.weight(*d)).sum();
    if !(total_weight > 0.0) {
        return 0;
    }

    let weighted: f64 = dimensions
        .iter()
        .map(|(d, score)| weights.weight(*d) * score.score)
        .sum();

    (weighted / total_weight).round().clamp(0.0, 100.0) as u8
}

/// Match and failure reasons of the weighted dimensions
///
/// A dimension yields at most one of the two.
pub fn explain(
    dimensions: &[(Dimension, &DimensionScore)],
    weights: &ScoringWeights,
    reason_threshold: u8,
    failure_threshold: u8,
) -> (Vec<String>, Vec<String>) {
    let mut reasons = Vec::new();
    let mut failures = Vec::new();

    for (dimension, score) in dimensions {
        if weights.weight(*dimension) <= 0.0 {
            continue;
        }

        let rounded = score.rounded();
        let detail = score.notes.join("; ");
        if rounded >= reason_threshold {
            reasons.push(format!("Strong {} fit ({}/100): {}", dimension.label(), rounded, detail));
        } else if rounded < failure_threshold {
            failures.push(format!("Weak {} fit ({}/100): {}", dimension.label(), rounded, detail));
        }
    }

    (reasons, failures)
}

fn summarize(
    total_candidates: usize,
    matches: &[MatchResult],
    rejected: usize,
    filtered_out: usize,
    min_score: u8,
) -> MatchSummary {
    let mut tiers = TierCounts::default();
    for result in matches {
        tiers.record(result.match_level);
    }

    let average_score = if matches.is_empty() {
        0.0
    } else {
        let total: u32 = matches.iter().map(|m| m.overall_score as u32).sum();
        (total as f64 / matches.len() as f64 * 100.0).round() / 100.0
    };

    MatchSummary {
        total_candidates,
        matched: matches.len(),
        rejected,
        filtered_out,
        min_score,
        tiers,
        average_score,
        best_match: matches.first().map(|best| BestMatch {
            property_id: best.property_id.clone(),
            overall_score: best.overall_score,
            match_level: best.match_level,
        }),
    }
}
