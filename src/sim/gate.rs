//! Per-half-cycle attempt gate
//!
//! Each breath window allows exactly one scoring attempt. A window's flag is
//! re-armed only once the opposite window has been entered, so holding inside
//! one long window cannot score twice.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseGate {
    inhale_threshold: f64,
    exhale_threshold: f64,
    inhale_used: bool,
    exhale_used: bool,
}

impl PhaseGate {
    /// Both flags start used so the very first frame can never score.
    pub fn new(inhale_threshold: f64, exhale_threshold: f64) -> Self {
        Self {
            inhale_threshold,
            exhale_threshold,
            inhale_used: true,
            exhale_used: true,
        }
    }

    #[inline]
    pub fn is_inhale_window(&self, value: f64) -> bool {
        value < self.inhale_threshold
    }

    #[inline]
    pub fn is_exhale_window(&self, value: f64) -> bool {
        value > self.exhale_threshold
    }

    /// Re-arm flags on window entry (call once per tick, after the phase update)
    pub fn update(&mut self, value: f64) {
        if self.exhale_used && self.is_inhale_window(value) {
            self.exhale_used = false;
        }
        if self.inhale_used && self.is_exhale_window(value) {
            self.inhale_used = false;
        }
    }

    /// Claim the inhale attempt for the current window
    pub fn try_consume_inhale(&mut self, value: f64) -> bool {
        if self.is_inhale_window(value) && !self.inhale_used {
            self.inhale_used = true;
            true
        } else {
            false
        }
    }

    /// Claim the exhale attempt for the current window
    pub fn try_consume_exhale(&mut self, value: f64) -> bool {
        if self.is_exhale_window(value) && !self.exhale_used {
            self.exhale_used = true;
            true
        } else {
            false
        }
    }

    pub fn inhale_used(&self) -> bool {
        self.inhale_used
    }

    pub fn exhale_used(&self) -> bool {
        self.exhale_used
    }
}
