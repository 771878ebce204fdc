//! Moving-target oscillator
//!
//! The target platform sweeps the track in a triangle wave. The step function
//! is pure so tests can replay any number of ticks.

use serde::{Deserialize, Serialize};

use crate::bounce;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Moving toward the right rail (1.0)
    Increasing,
    /// Moving toward the left rail (0.0)
    Decreasing,
}

impl Direction {
    #[inline]
    pub fn sign(&self) -> f32 {
        match self {
            Direction::Increasing => 1.0,
            Direction::Decreasing => -1.0,
        }
    }

    fn from_sign(sign: f32) -> Self {
        if sign >= 0.0 {
            Direction::Increasing
        } else {
            Direction::Decreasing
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingOscillator {
    pub position: f32,
    pub direction: Direction,
}

impl Default for TimingOscillator {
    fn default() -> Self {
        Self {
            position: 0.0,
            direction: Direction::Increasing,
        }
    }
}

impl TimingOscillator {
    /// Back to the left rail, heading right
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance by `dt` seconds at the speed implied by `cycle_duration`.
    ///
    /// Position clamps to the bound it reaches and the direction flips there;
    /// a step never carries the overshoot back into the track.
    pub fn step(&mut self, dt: f32, cycle_duration: f32) {
        let half = cycle_duration / 2.0;
        if half <= 0.0 || dt <= 0.0 {
            return;
        }
        let (position, sign) = bounce(self.position, self.direction.sign(), dt / half, 0.0, 1.0);
        self.position = position;
        self.direction = Direction::from_sign(sign);
    }
}
