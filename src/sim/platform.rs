//! Platforms and the floor-weighted hazard table

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Platform types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlatformKind {
    #[default]
    Normal,
    /// Crumbles a fixed time after landing
    Breaking,
    /// Sways side to side, wide and slow
    Moving,
    /// Sways side to side, tight and fast; narrower hit window
    Slippery,
}

impl PlatformKind {
    pub const ALL: [PlatformKind; 4] = [
        PlatformKind::Normal,
        PlatformKind::Breaking,
        PlatformKind::Moving,
        PlatformKind::Slippery,
    ];

    /// Whether standing on this platform runs the lateral sway
    pub fn sways(&self) -> bool {
        matches!(self, PlatformKind::Moving | PlatformKind::Slippery)
    }
}

/// A jump target in world space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub kind: PlatformKind,
    /// Horizontal position along the track (0 = left rail, 1 = right rail)
    pub x: f32,
    /// World Y; smaller is higher up the tower
    pub y: f32,
    pub is_target: bool,
}

impl Platform {
    pub fn new(id: u32, kind: PlatformKind, x: f32, y: f32) -> Self {
        Self {
            id,
            kind,
            x,
            y,
            is_target: false,
        }
    }

    /// Y on screen for the given world scroll
    #[inline]
    pub fn screen_y(&self, scroll_offset: f32) -> f32 {
        self.y + scroll_offset
    }
}

/// Floor at which hazards start appearing
pub const HAZARD_START_FLOOR: u32 = 5;

/// Map a uniform roll in [0, 1) to a platform type for `floor`.
///
/// Thresholds are cumulative: the first band whose upper edge exceeds the
/// roll wins.
pub fn type_for_roll(floor: u32, roll: f32) -> PlatformKind {
    use PlatformKind::*;

    if floor < HAZARD_START_FLOOR {
        return Normal;
    }

    let bands: &[(f32, PlatformKind)] = if floor < 15 {
        &[(0.7, Normal), (1.0, Breaking)]
    } else if floor < 30 {
        &[(0.5, Normal), (0.75, Breaking), (1.0, Moving)]
    } else {
        &[(0.4, Normal), (0.6, Breaking), (0.8, Moving), (1.0, Slippery)]
    };

    bands
        .iter()
        .find(|(edge, _)| roll < *edge)
        .map(|&(_, kind)| kind)
        .unwrap_or_else(|| bands[bands.len() - 1].1)
}

/// Draw a platform type for `floor`. Consumes one roll unless the floor is
/// below the hazard threshold.
pub fn select_type<R: Rng + ?Sized>(floor: u32, rng: &mut R) -> PlatformKind {
    if floor < HAZARD_START_FLOOR {
        return PlatformKind::Normal;
    }
    type_for_roll(floor, rng.random::<f32>())
}
