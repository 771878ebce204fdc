//! Tower Climber - precision-jump tower game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (oscillator, hazards, scroll world, session)
//! - `host`: Fixed-step driver that feeds frame time into the session
//! - `services`: Collaborator interfaces the session talks to
//! - `persistence`: Key-value storage backing progress and statistics
//! - `settings`: Data-driven game balance and layout constants

pub mod audio;
pub mod error;
pub mod highscores;
pub mod host;
pub mod persistence;
pub mod progress;
pub mod services;
pub mod settings;
pub mod sim;
pub mod statistics;

pub use error::{ConfigError, WorldError};
pub use highscores::HighScores;
pub use host::FixedStepHost;
pub use settings::{RetryPolicy, Settings};

/// Game loop constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the host will feed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// The player never moves horizontally; it stands at the track center
    pub const PLAYER_POSITION: f32 = 0.5;

    /// Countdown starts here and ticks once per `COUNTDOWN_STEP` seconds
    pub const COUNTDOWN_START: u32 = 3;
    pub const COUNTDOWN_STEP: f32 = 1.0;

    /// Floor and score of a fresh run
    pub const START_FLOOR: u32 = 1;
    pub const START_SCORE: u64 = 0;
}

/// Ping-pong a value inside `[lo, hi]`.
///
/// Returns the new value and the new direction sign. Reaching a bound exactly
/// counts as hitting it, so the direction flips on the bound itself.
#[inline]
pub fn bounce(value: f32, direction: f32, delta: f32, lo: f32, hi: f32) -> (f32, f32) {
    let next = value + direction * delta;
    if next >= hi {
        (hi, -1.0)
    } else if next <= lo {
        (lo, 1.0)
    } else {
        (next, direction)
    }
}
