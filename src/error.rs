//! Error types for configuration and world invariants
//!
//! Gameplay outcomes (hits, misses, collapses) are never errors. These types
//! only surface settings that cannot produce a playable tower and invariant
//! violations inside the scroll world.

use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A duration or length that must be strictly positive is not
    NotPositive { field: &'static str, value: f32 },
    /// Per-floor cycle decrement would make the game easier as it climbs
    NegativeDecrement { value: f32 },
    /// A fraction that must lie in (0, 1] does not
    FractionOutOfRange { field: &'static str, value: f32 },
    /// Minimum cycle duration is longer than the starting one
    CycleBoundsInverted { min: f32, base: f32 },
    /// Computed hit tolerance leaves no miss zone (or no hit zone)
    ToleranceOutOfRange { tolerance: f32 },
    /// The standing platform would scroll past the eviction line
    StandingPlatformOffscreen { standing_y: f32, eviction_line: f32 },
    /// Platform spacing does not leave room for the target above the standing platform
    SpacingTooLarge { spacing: f32, standing_y: f32 },
    /// A sway profile has a negative amplitude or speed
    InvalidSwayProfile { field: &'static str },
    /// Settings JSON could not be parsed
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::NegativeDecrement { value } => {
                write!(f, "per-floor cycle decrement must not be negative, got {value}")
            }
            Self::FractionOutOfRange { field, value } => {
                write!(f, "{field} must be in (0, 1], got {value}")
            }
            Self::CycleBoundsInverted { min, base } => write!(
                f,
                "min cycle duration {min}s exceeds base cycle duration {base}s"
            ),
            Self::ToleranceOutOfRange { tolerance } => {
                write!(f, "hit tolerance {tolerance} must be in (0, 0.5)")
            }
            Self::StandingPlatformOffscreen {
                standing_y,
                eviction_line,
            } => write!(
                f,
                "standing platform at y={standing_y} lies beyond eviction line y={eviction_line}"
            ),
            Self::SpacingTooLarge {
                spacing,
                standing_y,
            } => write!(
                f,
                "platform spacing {spacing} leaves no room above standing platform at y={standing_y}"
            ),
            Self::InvalidSwayProfile { field } => {
                write!(f, "sway profile {field} must not be negative")
            }
            Self::Parse(msg) => write!(f, "invalid settings json: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Scroll world invariant violations.
///
/// These indicate mismatched viewport/spacing constants, never a player action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorldError {
    /// `advance` was called without a platform above the standing one
    MissingTarget { current_index: usize, len: usize },
    /// Eviction would have removed the platform the player stands on
    StandingPlatformEvicted { id: u32 },
    /// Eviction would have removed the platform the player is jumping to
    TargetPlatformEvicted { id: u32 },
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTarget { current_index, len } => write!(
                f,
                "no target platform above index {current_index} (list has {len} platforms)"
            ),
            Self::StandingPlatformEvicted { id } => {
                write!(f, "eviction reached standing platform {id}")
            }
            Self::TargetPlatformEvicted { id } => {
                write!(f, "eviction reached target platform {id}")
            }
        }
    }
}

impl std::error::Error for WorldError {}
