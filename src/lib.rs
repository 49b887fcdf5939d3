//! Breath Pulse - a breathing-rhythm timing game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (breath clock, attempt gate, scoring, feedback text, session)
//! - `tuning`: Data-driven game balance
//! - `error`: Configuration errors
//!
//! Rendering is left to the caller; it reads [`sim::SessionSnapshot`] each frame.

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, ConfigResult};
pub use sim::{GameSession, SessionSnapshot, SessionState, TickInput, tick};
pub use tuning::Tuning;

/// Game configuration defaults
pub mod consts {
    /// Nominal driver rate (display refresh)
    pub const TICK_HZ: f64 = 60.0;
    /// Milliseconds per driver tick
    pub const TICK_MS: f64 = 1000.0 / TICK_HZ;

    /// One full breath (in and out), ms
    pub const BREATH_RHYTHM_MS: f64 = 10_000.0;
    /// Session length, ms
    pub const SESSION_LIMIT_MS: f64 = 60_000.0;

    /// Phase below this is the inhale window
    pub const INHALE_THRESHOLD: f64 = 0.25;
    /// Phase above this is the exhale window
    pub const EXHALE_THRESHOLD: f64 = 0.75;

    /// Awarded points = tier points * combo_len ^ COMBO_EXPONENT
    pub const COMBO_EXPONENT: f64 = 1.4;

    /// Feedback text velocity damping per tick
    pub const FEEDBACK_DAMPING: f32 = 0.9;
    /// Feedback text is removed once |vel|² drops below this
    pub const FEEDBACK_REMOVAL_EPSILON: f32 = 0.11;
    /// Horizontal spawn velocity range (px/tick)
    pub const FEEDBACK_VEL_X: (f32, f32) = (-1.5, 1.5);
    /// Vertical spawn velocity range (px/tick, negative is up)
    pub const FEEDBACK_VEL_Y: (f32, f32) = (-9.0, -6.0);

    /// Delay before a combo announcement appears, ms
    pub const COMBO_ANNOUNCE_DELAY_MS: f64 = 300.0;

    /// Circle diameter at phase 0 (render hint)
    pub const CIRCLE_INNER_DIAMETER: f32 = 25.0;
    /// Extra diameter at phase 1 (render hint)
    pub const CIRCLE_SWING: f32 = 150.0;
}
