//! Collaborators the jump session reports to
//!
//! The session owns gameplay state; everything it tells the outside world goes
//! through these traits. All calls are fire-and-forget: none of them return
//! anything the simulation depends on except the read-only counters.

pub use crate::audio::AudioSink;

use crate::audio::LogAudio;
use crate::persistence::MemoryStorage;
use crate::progress::ProgressStore;
use crate::settings::Settings;
use crate::statistics::StatisticsTracker;

/// Floor/score bookkeeping and persistence
pub trait ScoreStore {
    fn add_score(&mut self, delta: u64);
    fn climb_floor(&mut self);
    fn save_progress(&mut self);
    /// Clears the current run; best floor/score survive
    fn reset_progress(&mut self);

    fn current_floor(&self) -> u32;
    fn current_score(&self) -> u64;
    fn best_score(&self) -> u64;
    fn best_floor(&self) -> u32;
}

/// Lifetime gameplay counters
pub trait StatisticsSink {
    fn record_success(&mut self, score: u64);
    fn record_miss(&mut self);
    fn record_game(&mut self, floor: u32, score: u64, combo: u32);
    /// Seconds spent in an attempt that just ended
    fn record_play_time(&mut self, seconds: f64);
    fn total_games(&self) -> u32;
}

/// Unlock checks run after every landing and at the end of a climb
pub trait AchievementEvaluator {
    fn check_achievements(&mut self, floor: u32, score: u64, combo: u32, total_games: u32);
}

/// Evaluator for builds without an achievement table
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAchievements;

impl AchievementEvaluator for NullAchievements {
    fn check_achievements(&mut self, floor: u32, score: u64, combo: u32, total_games: u32) {
        log::trace!(
            "achievement check skipped (floor {floor}, score {score}, combo {combo}, games {total_games})"
        );
    }
}

/// Everything a session needs from the outside world
pub struct Services {
    pub store: Box<dyn ScoreStore>,
    pub statistics: Box<dyn StatisticsSink>,
    pub achievements: Box<dyn AchievementEvaluator>,
    pub audio: Box<dyn AudioSink>,
}

impl Services {
    /// Stores backed by `storage`, logging audio, no achievements
    pub fn with_storage(storage: MemoryStorage, settings: &Settings) -> Self {
        Self {
            store: Box::new(ProgressStore::load(storage.clone())),
            statistics: Box::new(StatisticsTracker::load(storage)),
            achievements: Box::new(NullAchievements),
            audio: Box::new(LogAudio::from_settings(settings)),
        }
    }
}
