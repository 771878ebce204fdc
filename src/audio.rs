//! Sound and haptic feedback sink
//!
//! The simulation never waits on feedback: it fires a cue and moves on. Real
//! playback lives in the host app; this module defines the cues and a
//! logging implementation used by the headless runner.

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Jump button accepted
    Tap,
    /// Landed on the target platform
    Success,
    /// Missed the target or the platform collapsed
    Miss,
    /// One countdown step before the climb starts
    Countdown,
}

/// Haptic pattern paired with each sound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticStyle {
    Light,
    Medium,
    Success,
    Warning,
}

impl SoundEffect {
    pub fn haptic(&self) -> HapticStyle {
        match self {
            SoundEffect::Tap => HapticStyle::Light,
            SoundEffect::Success => HapticStyle::Success,
            SoundEffect::Miss => HapticStyle::Warning,
            SoundEffect::Countdown => HapticStyle::Medium,
        }
    }
}

/// Fire-and-forget feedback output
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);

    fn play_tap(&mut self) {
        self.play(SoundEffect::Tap);
    }

    fn play_success(&mut self) {
        self.play(SoundEffect::Success);
    }

    fn play_miss(&mut self) {
        self.play(SoundEffect::Miss);
    }

    fn play_countdown(&mut self) {
        self.play(SoundEffect::Countdown);
    }
}

/// Feedback manager that logs cues instead of playing them
#[derive(Debug, Clone)]
pub struct LogAudio {
    sound_enabled: bool,
    haptics_enabled: bool,
    played: u32,
}

impl Default for LogAudio {
    fn default() -> Self {
        Self::new(true, true)
    }
}

impl LogAudio {
    pub fn new(sound_enabled: bool, haptics_enabled: bool) -> Self {
        Self {
            sound_enabled,
            haptics_enabled,
            played: 0,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.sound_enabled, settings.haptics_enabled)
    }

    /// Number of cues actually emitted
    pub fn played(&self) -> u32 {
        self.played
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect) {
        if !self.sound_enabled {
            return;
        }
        self.played += 1;
        if self.haptics_enabled {
            log::debug!("cue {:?} (haptic {:?})", effect, effect.haptic());
        } else {
            log::debug!("cue {:?}", effect);
        }
    }
}
