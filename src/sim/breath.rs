//! Breath clock
//!
//! The breathing cycle is a pure function of elapsed time:
//! - value 0 = fully exhaled, 1 = fully inhaled
//! - direction flips a quarter period ahead of the extremes, so it changes
//!   when the value crosses its midpoint

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Which way the breath is currently moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreathDirection {
    Inhaling,
    Exhaling,
}

/// Phase of the breathing cycle at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreathPhase {
    /// Normalized oscillation in [0, 1]
    pub value: f64,
    pub direction: BreathDirection,
}

impl BreathPhase {
    /// Phase shown before the session starts
    pub const REST: BreathPhase = BreathPhase {
        value: 0.0,
        direction: BreathDirection::Inhaling,
    };

    /// Diameter of the breathing circle for this phase
    #[inline]
    pub fn circle_diameter(&self, inner: f32, swing: f32) -> f32 {
        inner + swing * self.value as f32
    }
}

/// Compute the breath phase at `elapsed_ms` into a cycle of `rhythm_period_ms`
pub fn phase_at(elapsed_ms: f64, rhythm_period_ms: f64) -> BreathPhase {
    let value = 0.5 - 0.5 * (TAU * elapsed_ms / rhythm_period_ms).cos();
    let shifted = (elapsed_ms + rhythm_period_ms / 4.0).rem_euclid(rhythm_period_ms);
    let direction = if shifted < rhythm_period_ms / 2.0 {
        BreathDirection::Inhaling
    } else {
        BreathDirection::Exhaling
    };

    BreathPhase {
        // cos can overshoot by an ulp
        value: value.clamp(0.0, 1.0),
        direction,
    }
}
