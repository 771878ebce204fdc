//! Scrolling tower world
//!
//! Platforms are kept bottom-to-top: index `i` is always higher up the tower
//! (smaller world Y) than index `i - 1`. The player stands on
//! `platforms[current_index]` and aims for `platforms[current_index + 1]`.
//!
//! Every successful jump scrolls the world down by one platform spacing,
//! appends a fresh platform on top and drops whatever fell below the
//! viewport. The standing platform therefore always sits at the same screen
//! Y, which is what `Settings::validate` checks against the eviction line.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::platform::{Platform, PlatformKind, select_type};
use crate::consts::PLAYER_POSITION;
use crate::error::WorldError;
use crate::settings::Settings;

/// Summary of one `advance`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvanceReport {
    /// Platform appended on top
    pub appended: u32,
    /// Platforms dropped below the viewport, bottom first
    pub evicted: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollWorld {
    platforms: Vec<Platform>,
    current_index: usize,
    /// Total downward scroll; screen Y = world Y + scroll_offset
    scroll_offset: f32,
    /// Floor the next appended platform belongs to
    next_floor: u32,
    next_id: u32,
    spacing: f32,
    standing_y: f32,
    eviction_line: f32,
}

impl ScrollWorld {
    pub fn new(settings: &Settings) -> Self {
        Self {
            platforms: Vec::new(),
            current_index: 0,
            scroll_offset: 0.0,
            next_floor: 0,
            next_id: 1,
            spacing: settings.platform_spacing,
            standing_y: settings.standing_y,
            eviction_line: settings.eviction_line(),
        }
    }

    fn next_platform_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Lay out the standing, target and next platforms for `start_floor`
    pub fn initialize<R: Rng + ?Sized>(&mut self, start_floor: u32, rng: &mut R) {
        self.platforms.clear();
        self.current_index = 0;
        self.scroll_offset = 0.0;

        let standing_id = self.next_platform_id();
        self.platforms.push(Platform::new(
            standing_id,
            PlatformKind::Normal,
            PLAYER_POSITION,
            self.standing_y,
        ));

        for offset in 1..=2u32 {
            let kind = select_type(start_floor + offset, rng);
            let id = self.next_platform_id();
            let y = self.standing_y - offset as f32 * self.spacing;
            self.platforms.push(Platform::new(id, kind, 0.0, y));
        }
        self.next_floor = start_floor + 3;
        self.retag_target();

        log::debug!(
            "World initialized at floor {start_floor}: target {:?}, next {:?}",
            self.platforms[1].kind,
            self.platforms[2].kind
        );
    }

    /// Move the player onto the target platform after a successful jump.
    ///
    /// The landed platform keeps the position it was caught at; the new top
    /// platform always starts on the left rail.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        landed_at: f32,
        landed_kind: PlatformKind,
        rng: &mut R,
    ) -> Result<AdvanceReport, WorldError> {
        let target_index = self.current_index + 1;
        let len = self.platforms.len();
        if target_index >= len {
            return Err(WorldError::MissingTarget {
                current_index: self.current_index,
                len,
            });
        }

        // Check the new standing/target pair before touching anything
        let scroll_offset = self.scroll_offset + self.spacing;
        let standing = &self.platforms[target_index];
        if standing.screen_y(scroll_offset) > self.eviction_line {
            log::error!("Standing platform {} would be evicted", standing.id);
            return Err(WorldError::StandingPlatformEvicted { id: standing.id });
        }
        if let Some(target) = self.platforms.get(target_index + 1) {
            if target.screen_y(scroll_offset) > self.eviction_line {
                log::error!("Target platform {} would be evicted", target.id);
                return Err(WorldError::TargetPlatformEvicted { id: target.id });
            }
        }

        let top_y = self.platforms[len - 1].y - self.spacing;
        let landed = &mut self.platforms[target_index];
        debug_assert_eq!(landed.kind, landed_kind, "landed on a different platform type");
        landed.x = landed_at.clamp(0.0, 1.0);
        landed.kind = landed_kind;

        self.current_index = target_index;

        let kind = select_type(self.next_floor, rng);
        self.next_floor += 1;
        let appended = self.next_platform_id();
        self.platforms.push(Platform::new(appended, kind, 0.0, top_y));

        self.scroll_offset = scroll_offset;
        let evicted = self.evict_offscreen();
        self.retag_target();

        Ok(AdvanceReport { appended, evicted })
    }

    /// Drop platforms below the eviction line and re-base `current_index`
    /// by the number removed at or below it, in one pass over the list.
    fn evict_offscreen(&mut self) -> Vec<u32> {
        let scroll_offset = self.scroll_offset;
        let line = self.eviction_line;
        let current = self.current_index;

        let mut index = 0usize;
        let mut removed_at_or_below = 0usize;
        let mut evicted = Vec::new();
        self.platforms.retain(|p| {
            let keep = p.screen_y(scroll_offset) <= line;
            if !keep {
                if index <= current {
                    removed_at_or_below += 1;
                }
                evicted.push(p.id);
            }
            index += 1;
            keep
        });

        self.current_index = rebase_index(current, removed_at_or_below);
        if !evicted.is_empty() {
            log::debug!("Evicted platforms {evicted:?}, current index {}", self.current_index);
        }
        evicted
    }

    /// Exactly one target: the platform right above the standing one
    fn retag_target(&mut self) {
        let target_index = self.current_index + 1;
        for (i, platform) in self.platforms.iter_mut().enumerate() {
            platform.is_target = i == target_index;
        }
    }

    /// Track the oscillator with the target platform
    pub fn set_target_x(&mut self, x: f32) {
        if let Some(target) = self.platforms.get_mut(self.current_index + 1) {
            target.x = x;
        }
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn standing(&self) -> Option<&Platform> {
        self.platforms.get(self.current_index)
    }

    pub fn target(&self) -> Option<&Platform> {
        self.platforms.get(self.current_index + 1)
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }
}

/// Index after removing `removed` platforms at or below it
#[inline]
pub fn rebase_index(old_index: usize, removed: usize) -> usize {
    old_index.saturating_sub(removed)
}
