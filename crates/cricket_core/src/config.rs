//! Scoring configuration.
//!
//! Everything the scoring session and commentary tracker would otherwise hard
//! code. Loaded from YAML or JSON, or from the file named by
//! `CRICKET_SCORING_CONFIG`.
//!
//! ```rust
//! use cricket_core::config::ScoringConfig;
//!
//! let config = ScoringConfig::default();
//! assert_eq!(config.players.bowler_placeholder(), "Bowler 1");
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{env, fs};

pub const SCORING_CONFIG_PATH_ENV: &str = "CRICKET_SCORING_CONFIG";

/// Config read once from `CRICKET_SCORING_CONFIG`, falling back to defaults.
pub static ACTIVE_CONFIG: Lazy<ScoringConfig> = Lazy::new(|| match ScoringConfig::from_env() {
    Ok(Some(config)) => config,
    Ok(None) => ScoringConfig::default(),
    Err(e) => {
        log::warn!("{e}; using default scoring config");
        ScoringConfig::default()
    }
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ScoringConfig {
    #[serde(default)]
    pub players: PlaceholderConfig,
    #[serde(default)]
    pub breaks: BreakConfig,
    #[serde(default)]
    pub commentary: CommentaryConfig,
}

/// Names given to on-field roles nobody has named yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderConfig {
    /// (default: "Batsman")
    pub batsman_prefix: String,
    /// (default: "Bowler")
    pub bowler_prefix: String,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self { batsman_prefix: "Batsman".to_string(), bowler_prefix: "Bowler".to_string() }
    }
}

impl PlaceholderConfig {
    /// `Batsman 3` for n = 3.
    pub fn batsman(&self, n: usize) -> String {
        format!("{} {}", self.batsman_prefix, n)
    }

    pub fn bowler_placeholder(&self) -> String {
        format!("{} 1", self.bowler_prefix)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakConfig {
    /// Reason stamped when a timeout is called without one (default: "Drinks Break")
    pub default_timeout_reason: String,
    /// Countdown used by `schedule_next_innings` when none is given (default: 60)
    pub innings_break_secs: u32,
}

impl Default for BreakConfig {
    fn default() -> Self {
        Self { default_timeout_reason: "Drinks Break".to_string(), innings_break_secs: 60 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentaryConfig {
    /// Chance a lone dot ball gets a line (default: 0.2)
    pub dot_ball_chance: f64,
    /// Chance an over-end line replaces the ball line (default: 0.5)
    pub over_end_chance: f64,
    /// Consecutive dots that trigger a pressure line (default: 3)
    pub pressure_streak: u32,
}

impl Default for CommentaryConfig {
    fn default() -> Self {
        Self { dot_ball_chance: 0.2, over_end_chance: 0.5, pressure_streak: 3 }
    }
}

impl ScoringConfig {
    pub fn from_json(content: &str) -> Result<Self, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }

    pub fn from_yaml(content: &str) -> Result<Self, String> {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Parse by file extension: `.json` as JSON, anything else as YAML.
    pub fn from_path_str(path: &str, content: &str) -> Result<Self, String> {
        if path.ends_with(".json") {
            Self::from_json(content)
        } else {
            Self::from_yaml(content)
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.players.batsman_prefix.trim().is_empty() {
            return Err("players.batsman_prefix must not be blank".to_string());
        }
        if self.players.bowler_prefix.trim().is_empty() {
            return Err("players.bowler_prefix must not be blank".to_string());
        }
        if self.breaks.default_timeout_reason.trim().is_empty() {
            return Err("breaks.default_timeout_reason must not be blank".to_string());
        }
        for (name, value) in [
            ("commentary.dot_ball_chance", self.commentary.dot_ball_chance),
            ("commentary.over_end_chance", self.commentary.over_end_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{name} must be within 0.0..=1.0, got {value}"));
            }
        }
        if self.commentary.pressure_streak == 0 {
            return Err("commentary.pressure_streak must be at least 1".to_string());
        }
        Ok(())
    }

    /// Load from the file named by `CRICKET_SCORING_CONFIG`.
    ///
    /// `Ok(None)` when the variable is unset or blank.
    pub fn from_env() -> Result<Option<Self>, String> {
        let Ok(path) = env::var(SCORING_CONFIG_PATH_ENV) else {
            return Ok(None);
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|e| {
            format!("Failed to read scoring config from {SCORING_CONFIG_PATH_ENV}='{path}': {e}")
        })?;

        let config = Self::from_path_str(path, &content).map_err(|e| {
            format!("Failed to parse scoring config from {SCORING_CONFIG_PATH_ENV}='{path}': {e}")
        })?;

        config
            .validate()
            .map_err(|e| format!("Invalid scoring config from {SCORING_CONFIG_PATH_ENV}='{path}': {e}"))?;

        log::info!("Loaded scoring config from {path}");
        Ok(Some(config))
    }

    /// No commentary randomness: dots are silent, over-ends always called.
    pub fn deterministic() -> Self {
        let mut cfg = Self::default();
        cfg.commentary.dot_ball_chance = 0.0;
        cfg.commentary.over_end_chance = 1.0;
        cfg
    }
}
