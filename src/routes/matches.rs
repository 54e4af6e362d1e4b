use actix_web::{web, HttpResponse};

use crate::config::MatchingSettings;
use crate::core::Matcher;
use crate::models::{
    ErrorResponse, HealthResponse, MatchMode, RankRequest, RankResponse, ScoreRequest,
    ScoreResponse, ScoringWeights,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub permissive: Matcher,
    pub strict: Matcher,
    pub default_mode: MatchMode,
    pub max_candidates: usize,
}

impl AppState {
    pub fn from_settings(settings: &MatchingSettings) -> Self {
        Self {
            permissive: settings.matcher(MatchMode::Permissive),
            strict: settings.matcher(MatchMode::Strict),
            default_mode: settings.default_mode,
            max_candidates: settings.max_candidates,
        }
    }

    /// Matcher for a request: its mode (or the default) and optional weight override
    pub fn matcher_for(&self, mode: Option<MatchMode>, weights: Option<ScoringWeights>) -> Matcher {
        let matcher = match mode.unwrap_or(self.default_mode) {
            MatchMode::Permissive => self.permissive.clone(),
            MatchMode::Strict => self.strict.clone(),
        };
        match weights {
            Some(weights) => matcher.with_weights(weights),
            None => matcher,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_settings(&MatchingSettings::default())
    }
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/rank", web::post().to(rank_matches))
        .route("/matches/score", web::post().to(score_property));
}

/// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Rank a candidate set
///
/// POST /api/v1/matches/rank
///
/// Request body:
/// ```json
/// {
///   "candidates": [{ "id": "p1", "state": "CA", "squareFootage": "5,000 SF" }],
///   "criteria": { "location": { "state": "CA" }, "maxRatePerSqft": 40 },
///   "minScore": 50,
///   "mode": "strict",
///   "limit": 20
/// }
/// ```
async fn rank_matches(
    state: web::Data<AppState>,
    req: web::Json<RankRequest>,
) -> Result<HttpResponse, ErrorResponse> {
    if let Err(e) = req.check(state.max_candidates) {
        tracing::info!("Rejected rank request with {} candidates: {}", req.candidates.len(), e);
        return Err(e.into());
    }

    let req = req.into_inner();
    let matcher = state.matcher_for(req.mode, req.weights);

    tracing::info!(
        "Ranking {} candidates (mode: {:?}, min_score: {:?}, limit: {:?})",
        req.candidates.len(),
        matcher.mode(),
        req.min_score,
        req.limit
    );

    // Large candidate sets fan out on rayon; keep that off the worker thread
    let mode = matcher.mode();
    let outcome = web::block(move || {
        matcher.rank_with_limit(&req.candidates, &req.criteria, req.min_score, req.limit)
    })
    .await
    .map_err(|e| {
        tracing::error!("Ranking task failed: {}", e);
        ErrorResponse::internal("ranking_failed", e.to_string())
    })?;

    tracing::info!(
        "Ranked {} candidates: {} matched, {} rejected, {} filtered out",
        outcome.summary.total_candidates,
        outcome.summary.matched,
        outcome.summary.rejected,
        outcome.summary.filtered_out
    );

    Ok(HttpResponse::Ok().json(RankResponse { mode, outcome }))
}

/// Score one property without ranking gates
///
/// POST /api/v1/matches/score
async fn score_property(
    state: web::Data<AppState>,
    req: web::Json<ScoreRequest>,
) -> Result<HttpResponse, ErrorResponse> {
    if let Err(e) = req.check() {
        tracing::info!("Rejected score request for property {:?}: {}", req.property.id, e);
        return Err(e.into());
    }

    let req = req.into_inner();
    let matcher = state.matcher_for(req.mode, req.weights);
    let result = matcher.score_property(&req.property, &req.criteria);

    tracing::info!(
        "Scored property {}: {} ({:?})",
        result.property_id,
        result.overall_score,
        result.match_level
    );

    Ok(HttpResponse::Ok().json(ScoreResponse {
        mode: matcher.mode(),
        result,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matcher_for_defaults_to_configured_mode() {
        let mut settings = MatchingSettings::default();
        settings.default_mode = MatchMode::Strict;
        let state = AppState::from_settings(&settings);

        assert_eq!(state.matcher_for(None, None).mode(), MatchMode::Strict);
        assert_eq!(
            state.matcher_for(Some(MatchMode::Permissive), None).mode(),
            MatchMode::Permissive
        );
    }

    #[test]
    fn test_matcher_for_applies_weight_override() {
        let state = AppState::default();
        let weights = ScoringWeights {
            location: 1.0,
            size: 0.0,
            building_type: 0.0,
            financial: 0.0,
            compliance: 0.0,
        };

        let matcher = state.matcher_for(Some(MatchMode::Strict), Some(weights));
        assert_eq!(matcher.config().weights, weights);
        assert_eq!(matcher.config().min_score, 70);
    }
}
