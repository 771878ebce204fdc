//! Session phases, events and the presentation snapshot
//!
//! The session owns all of this; hosts only ever see it through
//! [`JumpSession::snapshot`](super::tick::JumpSession::snapshot) and drained
//! events.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::oscillator::Direction;
use super::platform::PlatformKind;

/// Why an attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureCause {
    /// Jumped outside the hit window
    Miss,
    /// Stood on a breaking platform for too long
    Collapse,
}

/// Kind of jump resolution in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Success,
    Failure(FailureCause),
}

/// How an attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    TryAgain { cause: FailureCause },
}

/// Current phase of a jump session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// 3-2-1 before the target starts moving
    Countdown,
    /// Target moving, jump input accepted
    Active,
    /// Jump animation playing; input locked
    Resolving(Resolution),
    /// Attempt over, waiting for retry or exit
    Result(Outcome),
}

impl GamePhase {
    pub fn is_active(&self) -> bool {
        matches!(self, GamePhase::Active)
    }

    pub fn is_result(&self) -> bool {
        matches!(self, GamePhase::Result(_))
    }
}

/// Things that happened during a tick, for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    CountdownTick { remaining: u32 },
    PhaseChanged { from: GamePhase, to: GamePhase },
    JumpLanded { floor: u32, score_delta: u64, combo: u32 },
    JumpMissed { position: f32, floor: u32 },
    PlatformCollapsed { id: u32 },
    PlatformsEvicted { ids: Vec<u32> },
}

/// A platform as the renderer should draw it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformView {
    pub id: u32,
    pub kind: PlatformKind,
    /// Pixels from the left end of the track, and screen Y
    pub screen: Vec2,
    pub is_target: bool,
    pub is_standing: bool,
}

/// Read-only view of a session, rebuilt every tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    /// Visible countdown number (0 once the climb has started)
    pub countdown: u32,
    pub floor: u32,
    pub score: u64,
    pub combo: u32,
    pub best_combo: u32,
    pub oscillator_position: f32,
    pub oscillator_direction: Direction,
    /// Sway of the standing platform in pixels
    pub lateral_offset: f32,
    /// None unless standing on a breaking platform
    pub breaking_progress: Option<f32>,
    pub scroll_offset: f32,
    pub platforms: Vec<PlatformView>,
    pub time_ticks: u64,
}

impl Snapshot {
    pub fn target(&self) -> Option<&PlatformView> {
        self.platforms.iter().find(|p| p.is_target)
    }

    pub fn standing(&self) -> Option<&PlatformView> {
        self.platforms.iter().find(|p| p.is_standing)
    }
}
