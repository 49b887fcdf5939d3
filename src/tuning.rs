//! Data-driven game balance
//!
//! Every knob of a session lives here. Partial JSON files override only the
//! fields they name; the rest fall back to [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, ConfigResult};
use crate::sim::feedback::FeedbackTuning;
use crate::sim::scoring::{ComboAnnounceRule, ScoreTier, TierTable};

/// Session tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// One full breath, ms
    pub rhythm_period_ms: f64,
    /// Session length, ms
    pub time_limit_ms: f64,
    pub inhale_threshold: f64,
    pub exhale_threshold: f64,
    /// Ordered best-first; last threshold must be 1
    pub tiers: Vec<ScoreTier>,
    pub combo_exponent: f64,
    pub combo_announce: ComboAnnounceRule,
    pub feedback: FeedbackTuning,
    /// Seed for feedback text drift
    pub seed: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            rhythm_period_ms: BREATH_RHYTHM_MS,
            time_limit_ms: SESSION_LIMIT_MS,
            inhale_threshold: INHALE_THRESHOLD,
            exhale_threshold: EXHALE_THRESHOLD,
            tiers: default_tiers(),
            combo_exponent: COMBO_EXPONENT,
            combo_announce: ComboAnnounceRule::default(),
            feedback: FeedbackTuning::default(),
            seed: 0,
        }
    }
}

/// The six accuracy ranks, best first
pub fn default_tiers() -> Vec<ScoreTier> {
    vec![
        ScoreTier::new("perfect", 0.001, 1000),
        ScoreTier::new("incredible", 0.002, 800),
        ScoreTier::new("amazing", 0.004, 600),
        ScoreTier::new("great", 0.008, 450),
        ScoreTier::new("good", 0.016, 300),
        ScoreTier::new("poor", 1.0, 0),
    ]
}

impl Tuning {
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the validated tier table
    pub fn tier_table(&self) -> ConfigResult<TierTable> {
        TierTable::new(self.tiers.clone())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.rhythm_period_ms.is_finite() && self.rhythm_period_ms > 0.0) {
            return Err(ConfigError::NonPositiveRhythmPeriod(self.rhythm_period_ms));
        }
        if !(self.time_limit_ms.is_finite() && self.time_limit_ms > 0.0) {
            return Err(ConfigError::NonPositiveTimeLimit(self.time_limit_ms));
        }

        let in_unit = |v: f64| v > 0.0 && v < 1.0;
        if !in_unit(self.inhale_threshold) || !in_unit(self.exhale_threshold) {
            return Err(ConfigError::Invalid(format!(
                "window thresholds must be in (0, 1), got inhale {} / exhale {}",
                self.inhale_threshold, self.exhale_threshold
            )));
        }
        if self.inhale_threshold >= self.exhale_threshold {
            return Err(ConfigError::Invalid(format!(
                "inhale threshold {} must be below exhale threshold {}",
                self.inhale_threshold, self.exhale_threshold
            )));
        }

        self.tier_table()?;

        if !(self.combo_exponent.is_finite() && self.combo_exponent >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "combo exponent must be a non-negative number, got {}",
                self.combo_exponent
            )));
        }
        if !(self.combo_announce.delay_ms.is_finite() && self.combo_announce.delay_ms >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "combo announcement delay must be >= 0, got {}",
                self.combo_announce.delay_ms
            )));
        }

        let fb = &self.feedback;
        if !(fb.damping > 0.0 && fb.damping < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "feedback damping must be in (0, 1), got {}",
                fb.damping
            )));
        }
        if !(fb.removal_epsilon.is_finite() && fb.removal_epsilon > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "feedback removal epsilon must be positive, got {}",
                fb.removal_epsilon
            )));
        }
        for (name, (lo, hi)) in [("horizontal", fb.vel_x), ("vertical", fb.vel_y)] {
            if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
                return Err(ConfigError::Invalid(format!(
                    "feedback {name} velocity range ({lo}, {hi}) is invalid"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.tier_table().unwrap().len(), 6);
    }

    #[test]
    fn test_partial_json_overrides() {
        let tuning = Tuning::from_json_str(
            r#"{
                "rhythm_period_ms": 8000,
                "tiers": [
                    { "label": "PERFECT", "threshold": 0.001, "points": 1000 },
                    { "label": "GOOD", "threshold": 0.022, "points": 300 },
                    { "label": "POOR", "threshold": 1.0, "points": 0 }
                ],
                "feedback": { "damping": 0.85 }
            }"#,
        )
        .unwrap();
        assert_eq!(tuning.rhythm_period_ms, 8000.0);
        assert_eq!(tuning.time_limit_ms, SESSION_LIMIT_MS);
        assert_eq!(tuning.tiers[1].threshold, 0.022);
        assert_eq!(tuning.feedback.damping, 0.85);
        assert_eq!(tuning.feedback.removal_epsilon, FEEDBACK_REMOVAL_EPSILON);
    }

    #[test]
    fn test_json_round_trip() {
        let tuning = Tuning::default();
        let json = tuning.to_json().unwrap();
        let parsed = Tuning::from_json_str(&json).unwrap();
        assert_eq!(parsed.rhythm_period_ms, tuning.rhythm_period_ms);
        assert_eq!(parsed.combo_announce, tuning.combo_announce);
        let labels: Vec<_> = parsed.tiers.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["perfect", "incredible", "amazing", "great", "good", "poor"]);
    }

    #[test]
    fn test_rejects_bad_period_and_limit() {
        let tuning = Tuning {
            rhythm_period_ms: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::NonPositiveRhythmPeriod(_))
        ));

        let tuning = Tuning {
            time_limit_ms: -5.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::NonPositiveTimeLimit(_))
        ));
    }

    #[test]
    fn test_rejects_bad_tiers() {
        let tuning = Tuning {
            tiers: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::EmptyTierTable)));
    }

    #[test]
    fn test_rejects_crossed_windows() {
        let tuning = Tuning {
            inhale_threshold: 0.8,
            exhale_threshold: 0.2,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_bad_feedback() {
        let mut tuning = Tuning::default();
        tuning.feedback.damping = 1.0;
        assert!(tuning.validate().is_err());

        let mut tuning = Tuning::default();
        tuning.feedback.vel_y = (-2.0, -8.0);
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Tuning::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Tuning::load("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
