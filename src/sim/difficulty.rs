//! Difficulty scaling by floor

use crate::settings::Settings;

/// Seconds for the target to travel left→right→left on `floor`.
///
/// Shrinks linearly with the floor and bottoms out at the configured minimum.
pub fn cycle_duration(floor: u32, settings: &Settings) -> f32 {
    let climbed = floor.saturating_sub(1) as f32;
    (settings.base_cycle_duration - climbed * settings.per_floor_decrement)
        .max(settings.min_cycle_duration)
}
