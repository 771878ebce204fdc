//! Time-bounded hazards of the standing platform
//!
//! - Breaking: a countdown from landing to collapse
//! - Moving / Slippery: bounded side-to-side sway

use serde::{Deserialize, Serialize};

use super::platform::PlatformKind;
use crate::bounce;
use crate::settings::{Settings, SwayProfile};

/// Countdown to a breaking platform's collapse
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BreakingCountdown {
    /// 0 = just landed, 1 = collapsed; None while not on a breaking platform
    progress: Option<f32>,
}

impl BreakingCountdown {
    pub fn start(&mut self) {
        self.progress = Some(0.0);
    }

    /// Drop the countdown; nothing carries over to the next platform
    pub fn cancel(&mut self) {
        self.progress = None;
    }

    pub fn progress(&self) -> Option<f32> {
        self.progress
    }

    pub fn is_active(&self) -> bool {
        self.progress.is_some()
    }

    /// Advance by `dt`. Returns true on the step the platform collapses.
    pub fn step(&mut self, dt: f32, duration: f32) -> bool {
        let Some(progress) = self.progress.as_mut() else {
            return false;
        };
        if *progress >= 1.0 {
            return false;
        }
        *progress = (*progress + dt / duration).min(1.0);
        *progress >= 1.0
    }
}

/// Side-to-side sway of Moving/Slippery platforms (pixel offset)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LateralSway {
    pub offset: f32,
    direction: f32,
    profile: Option<SwayProfile>,
}

impl LateralSway {
    /// Sway profile for a platform type, if it sways at all
    pub fn profile_for(kind: PlatformKind, settings: &Settings) -> Option<SwayProfile> {
        match kind {
            PlatformKind::Moving => Some(settings.moving_sway),
            PlatformKind::Slippery => Some(settings.slippery_sway),
            PlatformKind::Normal | PlatformKind::Breaking => None,
        }
    }

    /// Centre the platform and pick the sway for `kind`
    pub fn reset(&mut self, kind: PlatformKind, settings: &Settings) {
        self.offset = 0.0;
        self.direction = 1.0;
        self.profile = Self::profile_for(kind, settings);
    }

    pub fn profile(&self) -> Option<SwayProfile> {
        self.profile
    }

    pub fn step(&mut self, dt: f32) {
        let Some(profile) = self.profile else {
            self.offset = 0.0;
            return;
        };
        let (offset, direction) = bounce(
            self.offset,
            self.direction,
            profile.speed * dt,
            -profile.amplitude,
            profile.amplitude,
        );
        self.offset = offset;
        self.direction = direction;
    }

    /// Offset converted into track position space
    pub fn normalized(&self, track_width_px: f32) -> f32 {
        self.offset / track_width_px
    }
}

/// What happened to the standing platform during one hazard step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardStep {
    Holding,
    Collapsed,
}

/// Hazard state for the platform the player stands on
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HazardTimers {
    pub breaking: BreakingCountdown,
    pub sway: LateralSway,
    standing: PlatformKind,
}

impl HazardTimers {
    /// Re-arm for a freshly landed platform
    pub fn on_landed(&mut self, kind: PlatformKind, settings: &Settings) {
        self.standing = kind;
        self.breaking.cancel();
        self.sway.reset(kind, settings);
        if kind == PlatformKind::Breaking {
            self.breaking.start();
        }
    }

    /// Advance whichever hazard the standing platform has
    pub fn step(&mut self, dt: f32, settings: &Settings) -> HazardStep {
        match self.standing {
            PlatformKind::Breaking => {
                if self.breaking.step(dt, settings.breaking_duration) {
                    HazardStep::Collapsed
                } else {
                    HazardStep::Holding
                }
            }
            PlatformKind::Moving | PlatformKind::Slippery => {
                self.sway.step(dt);
                HazardStep::Holding
            }
            PlatformKind::Normal => HazardStep::Holding,
        }
    }

    pub fn standing(&self) -> PlatformKind {
        self.standing
    }
}
