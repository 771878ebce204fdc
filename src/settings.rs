//! Game settings and balance constants
//!
//! Everything the simulation reads lives here so balance can be tuned from a
//! JSON file without touching code. Persisted separately from progress.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::persistence::{self, Storage};

/// What "Try Again" does with the floor and score of the failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RetryPolicy {
    /// Start over from floor 1 with zero score
    #[default]
    Restart,
    /// Keep climbing from the floor and score reached
    Resume,
}

impl RetryPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetryPolicy::Restart => "restart",
            RetryPolicy::Resume => "resume",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "restart" | "reset" => Some(RetryPolicy::Restart),
            "resume" | "continue" => Some(RetryPolicy::Resume),
            _ => None,
        }
    }
}

/// Side-to-side sway of a hazard platform (pixels, pixels/sec)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwayProfile {
    pub amplitude: f32,
    pub speed: f32,
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Timing ===
    /// Full back-and-forth time of the moving target on floor 1 (seconds)
    pub base_cycle_duration: f32,
    /// Cycle shrinks by this much per floor climbed
    pub per_floor_decrement: f32,
    /// Fastest the target will ever move
    pub min_cycle_duration: f32,

    // === Hit window ===
    /// Platform width as a fraction of the screen
    pub target_zone_width: f32,
    /// Fraction of the screen the target travels across
    pub track_width_fraction: f32,
    /// Extra forgiveness added to the half-width of the window
    pub hit_margin: f32,
    /// Tolerance multiplier when jumping off a slippery platform
    pub slippery_penalty: f32,

    // === Hazards ===
    /// Time a breaking platform holds the player (seconds)
    pub breaking_duration: f32,
    pub moving_sway: SwayProfile,
    pub slippery_sway: SwayProfile,
    /// Track width in pixels, converts sway offsets into position space
    pub track_width_px: f32,

    // === World layout ===
    /// Visible tower height (pixels)
    pub viewport_height: f32,
    /// Screen Y of the platform the player stands on
    pub standing_y: f32,
    /// Vertical distance between consecutive platforms
    pub platform_spacing: f32,
    /// Platforms are evicted once they fall this far below the viewport
    pub offscreen_margin: f32,

    // === Session ===
    /// Score for a landing is `score_base + floor * score_per_floor`
    pub score_base: u64,
    pub score_per_floor: u64,
    /// Jump arc plus world scroll after a successful landing (seconds)
    pub success_resolve_duration: f32,
    /// Short hop plus fall after a miss or collapse (seconds)
    pub failure_resolve_duration: f32,
    pub retry_policy: RetryPolicy,

    // === Feedback ===
    pub sound_enabled: bool,
    pub haptics_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_cycle_duration: 2.5,
            per_floor_decrement: 0.01,
            min_cycle_duration: 1.0,

            target_zone_width: 0.3,
            track_width_fraction: 0.8,
            hit_margin: 0.05,
            slippery_penalty: 0.6,

            breaking_duration: 2.0,
            moving_sway: SwayProfile {
                amplitude: 30.0,
                speed: 40.0,
            },
            slippery_sway: SwayProfile {
                amplitude: 15.0,
                speed: 80.0,
            },
            track_width_px: 280.0,

            viewport_height: 300.0,
            standing_y: 225.0,
            platform_spacing: 120.0,
            offscreen_margin: 60.0,

            score_base: 10,
            score_per_floor: 5,
            success_resolve_duration: 0.8,
            failure_resolve_duration: 1.0,
            retry_policy: RetryPolicy::Restart,

            sound_enabled: true,
            haptics_enabled: true,
        }
    }
}

impl Settings {
    /// Storage key for persisted settings
    const STORAGE_KEY: &'static str = "tower_climber_settings";

    /// Half-width of the Normal hit window in position space
    pub fn hit_tolerance(&self) -> f32 {
        (self.target_zone_width / self.track_width_fraction) / 2.0 + self.hit_margin
    }

    /// Screen Y below which platforms are dropped from the world
    pub fn eviction_line(&self) -> f32 {
        self.viewport_height + self.offscreen_margin
    }

    /// Score awarded for landing while on `floor`
    pub fn score_for_floor(&self, floor: u32) -> u64 {
        self.score_base + floor as u64 * self.score_per_floor
    }

    /// Reject settings that cannot produce a playable tower
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("base_cycle_duration", self.base_cycle_duration),
            ("min_cycle_duration", self.min_cycle_duration),
            ("breaking_duration", self.breaking_duration),
            ("success_resolve_duration", self.success_resolve_duration),
            ("failure_resolve_duration", self.failure_resolve_duration),
            ("track_width_px", self.track_width_px),
            ("viewport_height", self.viewport_height),
            ("platform_spacing", self.platform_spacing),
        ];
        for (field, value) in positive {
            // NaN fails this check too
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        if !(self.per_floor_decrement >= 0.0) {
            return Err(ConfigError::NegativeDecrement {
                value: self.per_floor_decrement,
            });
        }
        if self.min_cycle_duration > self.base_cycle_duration {
            return Err(ConfigError::CycleBoundsInverted {
                min: self.min_cycle_duration,
                base: self.base_cycle_duration,
            });
        }

        let fractions = [
            ("target_zone_width", self.target_zone_width),
            ("track_width_fraction", self.track_width_fraction),
            ("slippery_penalty", self.slippery_penalty),
        ];
        for (field, value) in fractions {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::FractionOutOfRange { field, value });
            }
        }

        let tolerance = self.hit_tolerance();
        if !(tolerance > 0.0 && tolerance < 0.5) {
            return Err(ConfigError::ToleranceOutOfRange { tolerance });
        }

        for (field, profile) in [
            ("moving_sway", self.moving_sway),
            ("slippery_sway", self.slippery_sway),
        ] {
            if !(profile.amplitude >= 0.0 && profile.speed >= 0.0) {
                return Err(ConfigError::InvalidSwayProfile { field });
            }
        }

        // The standing platform always sits at `standing_y` on screen after a
        // scroll, so it must stay inside the eviction line.
        if self.standing_y > self.eviction_line() {
            return Err(ConfigError::StandingPlatformOffscreen {
                standing_y: self.standing_y,
                eviction_line: self.eviction_line(),
            });
        }
        if self.platform_spacing >= self.standing_y {
            return Err(ConfigError::SpacingTooLarge {
                spacing: self.platform_spacing,
                standing_y: self.standing_y,
            });
        }

        Ok(())
    }

    /// Parse settings from JSON (missing fields use defaults) and validate them
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from storage, falling back to defaults when absent or invalid
    pub fn load(storage: &impl Storage) -> Self {
        match persistence::load_json::<Settings>(storage, Self::STORAGE_KEY) {
            Some(settings) => match settings.validate() {
                Ok(()) => {
                    log::info!("Loaded settings from storage");
                    settings
                }
                Err(err) => {
                    log::warn!("Stored settings rejected ({err}), using defaults");
                    Self::default()
                }
            },
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to storage
    pub fn save(&self, storage: &impl Storage) {
        if persistence::save_json(storage, Self::STORAGE_KEY, self) {
            log::info!("Settings saved");
        }
    }
}
