//! Hit-window test for a jump
//!
//! The player stands at the track center. A jump lands when the effective
//! target position is within the tolerance of that center.

use serde::{Deserialize, Serialize};

use super::platform::PlatformKind;
use crate::consts::PLAYER_POSITION;
use crate::settings::Settings;

/// Result of a jump check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpOutcome {
    Hit,
    Miss,
}

impl JumpOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, JumpOutcome::Hit)
    }
}

/// Half-width of the hit window when jumping off a `kind` platform
pub fn tolerance_for(kind: PlatformKind, settings: &Settings) -> f32 {
    let base = settings.hit_tolerance();
    match kind {
        PlatformKind::Slippery => base * settings.slippery_penalty,
        _ => base,
    }
}

/// Where the target sits relative to the player once sway is applied.
///
/// Only Moving platforms shift the logical position; Slippery sway is
/// cosmetic and its difficulty comes from the narrower window instead.
pub fn effective_position(position: f32, kind: PlatformKind, lateral_offset_normalized: f32) -> f32 {
    match kind {
        PlatformKind::Moving => position + lateral_offset_normalized,
        _ => position,
    }
}

/// Decide whether a jump at `position` lands
pub fn evaluate(
    position: f32,
    kind: PlatformKind,
    lateral_offset_normalized: f32,
    settings: &Settings,
) -> JumpOutcome {
    let effective = effective_position(position, kind, lateral_offset_normalized);
    let distance = (effective - PLAYER_POSITION).abs();
    if distance < tolerance_for(kind, settings) {
        JumpOutcome::Hit
    } else {
        JumpOutcome::Miss
    }
}
