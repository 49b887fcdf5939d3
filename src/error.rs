//! Configuration errors
//!
//! Gameplay itself has no failure paths; everything that can go wrong is
//! caught when a session is built from its tuning.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tier table is empty")]
    EmptyTierTable,

    #[error("tier '{label}' threshold {threshold} is outside (0, 1]")]
    ThresholdOutOfRange { label: String, threshold: f64 },

    #[error("tier '{label}' threshold {threshold} does not exceed previous threshold {previous}")]
    NonIncreasingThreshold {
        label: String,
        threshold: f64,
        previous: f64,
    },

    #[error("last tier '{label}' must have threshold 1, found {threshold}")]
    FinalThresholdNotOne { label: String, threshold: f64 },

    #[error("rhythm period must be positive, got {0} ms")]
    NonPositiveRhythmPeriod(f64),

    #[error("time limit must be positive, got {0} ms")]
    NonPositiveTimeLimit(f64),

    #[error("Configuration Error: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
