//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Platforms kept in tower order (bottom to top)
//! - No rendering, audio or storage dependencies beyond the service traits

pub mod collision;
pub mod difficulty;
pub mod hazard;
pub mod oscillator;
pub mod platform;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{JumpOutcome, evaluate};
pub use difficulty::cycle_duration;
pub use hazard::{BreakingCountdown, HazardStep, HazardTimers, LateralSway};
pub use oscillator::{Direction, TimingOscillator};
pub use platform::{HAZARD_START_FLOOR, Platform, PlatformKind, select_type};
pub use state::{
    FailureCause, GameEvent, GamePhase, Outcome, PlatformView, Resolution, Snapshot,
};
pub use tick::{JumpSession, TickInput};
pub use world::{AdvanceReport, ScrollWorld};
