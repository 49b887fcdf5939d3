//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes only from the driver's `now_ms`
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod breath;
pub mod feedback;
pub mod gate;
pub mod scoring;
pub mod state;
pub mod tick;

pub use breath::{BreathDirection, BreathPhase, phase_at};
pub use feedback::{FeedbackText, FeedbackTextStream, FeedbackTuning};
pub use gate::PhaseGate;
pub use scoring::{ComboAnnounceRule, ComboState, ScoreEvent, ScoreTier, ScoringEngine, TierTable};
pub use state::{
    GameSession, ScheduledEvent, ScheduledPayload, SessionSnapshot, SessionState, SessionSummary,
    TierCount,
};
pub use tick::{TickInput, tick};
