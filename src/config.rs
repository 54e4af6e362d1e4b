use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::{Matcher, DEFAULT_PARALLEL_THRESHOLD};
use crate::models::{MatchMode, ScoringConfig, ScoringWeights, TierThresholds};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// Engine settings shared by both matching modes
#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default)]
    pub default_mode: MatchMode,
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
    #[serde(default)]
    pub tiers: TierThresholds,
    #[serde(default = "default_reason_threshold")]
    pub reason_threshold: u8,
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u8,
    #[serde(default = "default_size_tolerance")]
    pub size_tolerance: f64,
    #[serde(default)]
    pub permissive: ProfileSettings,
    #[serde(default)]
    pub strict: ProfileSettings,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_mode: MatchMode::default(),
            max_candidates: default_max_candidates(),
            parallel_threshold: default_parallel_threshold(),
            tiers: TierThresholds::default(),
            reason_threshold: default_reason_threshold(),
            failure_threshold: default_failure_threshold(),
            size_tolerance: default_size_tolerance(),
            permissive: ProfileSettings::default(),
            strict: ProfileSettings::default(),
        }
    }
}

fn default_max_candidates() -> usize { 5000 }
fn default_parallel_threshold() -> usize { DEFAULT_PARALLEL_THRESHOLD }
fn default_reason_threshold() -> u8 { 70 }
fn default_failure_threshold() -> u8 { 30 }
fn default_size_tolerance() -> f64 { 0.20 }

/// Per-mode overrides; unset values keep the mode's built-in defaults
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileSettings {
    pub min_score: Option<u8>,
    pub weights: Option<ScoringWeights>,
}

impl MatchingSettings {
    /// Scoring configuration for a mode, with configured overrides applied
    pub fn scoring_config(&self, mode: MatchMode) -> ScoringConfig {
        let profile = match mode {
            MatchMode::Permissive => &self.permissive,
            MatchMode::Strict => &self.strict,
        };

        let mut config = ScoringConfig::for_mode(mode);
        config.tiers = self.tiers;
        config.reason_threshold = self.reason_threshold;
        config.failure_threshold = self.failure_threshold;
        config.size_tolerance = self.size_tolerance;
        if let Some(min_score) = profile.min_score {
            config.min_score = min_score.min(100);
        }
        if let Some(weights) = profile.weights {
            config.weights = weights;
        }
        config
    }

    pub fn matcher(&self, mode: MatchMode) -> Matcher {
        Matcher::new(self.scoring_config(mode)).with_parallel_threshold(self.parallel_threshold)
    }

    /// Reject settings the engine cannot run with
    pub fn check(&self) -> Result<(), ConfigError> {
        for (name, profile) in [("permissive", &self.permissive), ("strict", &self.strict)] {
            if let Some(weights) = &profile.weights {
                if !weights.is_valid() {
                    return Err(ConfigError::Message(format!(
                        "matching.{}.weights must be finite, non-negative and not all zero",
                        name
                    )));
                }
            }
        }

        let tiers = &self.tiers;
        if !(tiers.excellent >= tiers.good && tiers.good >= tiers.fair) {
            return Err(ConfigError::Message(
                "matching.tiers must satisfy excellent >= good >= fair".to_string(),
            ));
        }

        if !(0.0..1.0).contains(&self.size_tolerance) {
            return Err(ConfigError::Message(
                "matching.size_tolerance must be in [0, 1)".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with CRE_MATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., CRE_MATCH__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?
            .try_deserialize()?;

        settings.matching.check()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?
            .try_deserialize()?;

        settings.matching.check()?;
        Ok(settings)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("CRE_MATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
