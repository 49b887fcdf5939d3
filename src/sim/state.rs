//! Session state and core simulation types
//!
//! Everything a single play owns lives in [`GameSession`]; nothing is global,
//! so sessions can run side by side and tests stay deterministic.

use serde::{Deserialize, Serialize};

use super::breath::BreathPhase;
use super::feedback::{FeedbackText, FeedbackTextStream};
use super::gate::PhaseGate;
use super::scoring::ScoringEngine;
use crate::error::ConfigResult;
use crate::tuning::Tuning;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Waiting for the first press
    NotStarted,
    /// Clock running, inputs scored
    Running,
    /// Time limit reached (terminal)
    Ended,
}

/// Work deferred to a later tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScheduledPayload {
    ComboAnnouncement { combo_length: u32 },
}

/// A payload due once session elapsed time reaches `fire_at_ms`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub fire_at_ms: f64,
    pub payload: ScheduledPayload,
}

/// Hits recorded for one tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCount {
    pub label: String,
    pub count: u32,
}

/// End-of-session report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub final_score: u64,
    pub max_combo: u32,
    pub attempts: u32,
    /// In tier table order, best first
    pub tier_counts: Vec<TierCount>,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub phase: BreathPhase,
    pub elapsed_ms: f64,
    pub remaining_ms: f64,
    pub combo_sum: u64,
    pub combo_length: u32,
    pub total_score: u64,
    pub feedback: Vec<FeedbackText>,
}

/// One play of the game
#[derive(Debug, Clone)]
pub struct GameSession {
    pub(super) tuning: Tuning,
    pub(super) state: SessionState,
    /// Driver time of the first press
    pub(super) start_ms: Option<f64>,
    /// Driver time of the latest tick
    pub(super) now_ms: f64,
    pub(super) phase: BreathPhase,
    pub(super) gate: PhaseGate,
    pub(super) scoring: ScoringEngine,
    pub(super) feedback: FeedbackTextStream,
    pub(super) pending: Vec<ScheduledEvent>,
    pub(super) tier_counts: Vec<u32>,
    pub(super) attempts: u32,
}

impl GameSession {
    /// Build a session, rejecting invalid tuning up front
    pub fn new(tuning: Tuning) -> ConfigResult<Self> {
        tuning.validate()?;
        let table = tuning.tier_table()?;
        let tier_counts = vec![0; table.len()];

        Ok(Self {
            state: SessionState::NotStarted,
            start_ms: None,
            now_ms: 0.0,
            phase: BreathPhase::REST,
            gate: PhaseGate::new(tuning.inhale_threshold, tuning.exhale_threshold),
            scoring: ScoringEngine::new(
                table,
                tuning.combo_exponent,
                tuning.combo_announce.clone(),
            ),
            feedback: FeedbackTextStream::new(tuning.feedback.clone(), tuning.seed),
            pending: Vec::new(),
            tier_counts,
            attempts: 0,
            tuning,
        })
    }

    /// Advance time-driven state to `now_ms`
    pub fn tick(&mut self, now_ms: f64) {
        super::tick::advance(self, now_ms);
    }

    /// Press (inhale) input; the first press starts the session
    pub fn press(&mut self) {
        super::tick::press(self);
    }

    /// Release (exhale) input
    pub fn release(&mut self) {
        super::tick::release(self);
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn phase(&self) -> BreathPhase {
        self.phase
    }

    /// Time since the first press, capped at the limit
    pub fn elapsed_ms(&self) -> f64 {
        match (self.state, self.start_ms) {
            (SessionState::NotStarted, _) | (_, None) => 0.0,
            (SessionState::Ended, _) => self.tuning.time_limit_ms,
            (SessionState::Running, Some(start)) => {
                (self.now_ms - start).clamp(0.0, self.tuning.time_limit_ms)
            }
        }
    }

    pub fn remaining_ms(&self) -> f64 {
        self.tuning.time_limit_ms - self.elapsed_ms()
    }

    pub fn total_score(&self) -> u64 {
        self.scoring.total_score()
    }

    pub fn combo_sum(&self) -> u64 {
        self.scoring.combo_sum()
    }

    pub fn combo_len(&self) -> u32 {
        self.scoring.combo_len()
    }

    /// Frozen score, once the session has ended
    pub fn final_score(&self) -> Option<u64> {
        (self.state == SessionState::Ended).then(|| self.scoring.total_score())
    }

    pub fn feedback(&self) -> &[FeedbackText] {
        self.feedback.entries()
    }

    /// Announcements waiting for their fire time
    pub fn pending_events(&self) -> &[ScheduledEvent] {
        &self.pending
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            phase: self.phase,
            elapsed_ms: self.elapsed_ms(),
            remaining_ms: self.remaining_ms(),
            combo_sum: self.scoring.combo_sum(),
            combo_length: self.scoring.combo_len(),
            total_score: self.scoring.total_score(),
            feedback: self.feedback.entries().to_vec(),
        }
    }

    pub fn summary(&self) -> SessionSummary {
        let tier_counts = self
            .scoring
            .table()
            .tiers()
            .iter()
            .zip(&self.tier_counts)
            .map(|(tier, &count)| TierCount {
                label: tier.label.clone(),
                count,
            })
            .collect();

        SessionSummary {
            final_score: self.scoring.total_score(),
            max_combo: self.scoring.max_combo(),
            attempts: self.attempts,
            tier_counts,
        }
    }
}
