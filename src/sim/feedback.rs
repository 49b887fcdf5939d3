//! Floating feedback text
//!
//! Score and combo text drifts away from its origin and fades out as its
//! velocity decays. Positions are in render space (pixels, +y down).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Physics knobs for feedback text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackTuning {
    /// Velocity multiplier applied every tick
    pub damping: f32,
    /// Entry is dropped once |vel|² falls below this
    pub removal_epsilon: f32,
    /// Horizontal spawn velocity range (inclusive)
    pub vel_x: (f32, f32),
    /// Vertical spawn velocity range (inclusive, negative is up)
    pub vel_y: (f32, f32),
    /// Where new text appears
    pub origin: Vec2,
}

impl Default for FeedbackTuning {
    fn default() -> Self {
        use crate::consts::*;
        Self {
            damping: FEEDBACK_DAMPING,
            removal_epsilon: FEEDBACK_REMOVAL_EPSILON,
            vel_x: FEEDBACK_VEL_X,
            vel_y: FEEDBACK_VEL_Y,
            origin: Vec2::ZERO,
        }
    }
}

/// One floating text entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackText {
    pub text: String,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Tier label for styling (None for combo announcements)
    pub hint: Option<String>,
    /// Set on combo announcements
    pub combo_length: Option<u32>,
}

/// All live feedback text for a session
#[derive(Debug, Clone)]
pub struct FeedbackTextStream {
    tuning: FeedbackTuning,
    rng: Pcg32,
    entries: Vec<FeedbackText>,
}

impl FeedbackTextStream {
    pub fn new(tuning: FeedbackTuning, seed: u64) -> Self {
        Self {
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            entries: Vec::new(),
        }
    }

    /// Spawn text with a random drift velocity
    pub fn spawn(
        &mut self,
        text: impl Into<String>,
        origin: Vec2,
        hint: Option<String>,
        combo_length: Option<u32>,
    ) {
        let (x_lo, x_hi) = self.tuning.vel_x;
        let (y_lo, y_hi) = self.tuning.vel_y;
        let vel = Vec2::new(
            self.rng.random_range(x_lo..=x_hi),
            self.rng.random_range(y_lo..=y_hi),
        );
        self.spawn_with_velocity(text, origin, vel, hint, combo_length);
    }

    pub fn spawn_with_velocity(
        &mut self,
        text: impl Into<String>,
        origin: Vec2,
        vel: Vec2,
        hint: Option<String>,
        combo_length: Option<u32>,
    ) {
        self.entries.push(FeedbackText {
            text: text.into(),
            pos: origin,
            vel,
            hint,
            combo_length,
        });
    }

    /// Advance every entry one tick and drop the ones that have settled
    pub fn tick(&mut self) {
        let damping = self.tuning.damping;
        let epsilon = self.tuning.removal_epsilon;
        self.entries.retain_mut(|entry| {
            entry.pos += entry.vel;
            entry.vel *= damping;
            entry.vel.length_squared() >= epsilon
        });
    }

    pub fn entries(&self) -> &[FeedbackText] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn origin(&self) -> Vec2 {
        self.tuning.origin
    }
}
