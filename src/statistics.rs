//! Lifetime statistics

use serde::{Deserialize, Serialize};

use crate::persistence::{self, Storage};
use crate::services::StatisticsSink;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameStatistics {
    pub total_games: u32,
    /// Sum of the running score at every landing
    pub total_score: u64,
    pub total_floors: u64,
    pub total_successful_jumps: u32,
    pub total_missed_jumps: u32,
    pub longest_combo: u32,
    pub highest_floor: u32,
    pub highest_score: u64,
    /// Seconds, summed over attempts
    pub total_play_time: f64,
}

impl GameStatistics {
    /// Landing percentage (0-100)
    pub fn success_rate(&self) -> f64 {
        let total = self.total_successful_jumps + self.total_missed_jumps;
        if total == 0 {
            return 0.0;
        }
        self.total_successful_jumps as f64 / total as f64 * 100.0
    }

    pub fn average_score(&self) -> f64 {
        if self.total_games == 0 {
            return 0.0;
        }
        self.total_score as f64 / self.total_games as f64
    }

    pub fn average_floor(&self) -> f64 {
        if self.total_games == 0 {
            return 0.0;
        }
        self.total_floors as f64 / self.total_games as f64
    }

    /// "1h 5m" or "12m"
    pub fn formatted_play_time(&self) -> String {
        let total = self.total_play_time.max(0.0) as u64;
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        if hours > 0 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{minutes}m")
        }
    }
}

/// [`StatisticsSink`] persisted through a key-value [`Storage`]
#[derive(Debug, Clone)]
pub struct StatisticsTracker<S: Storage> {
    storage: S,
    stats: GameStatistics,
}

impl<S: Storage> StatisticsTracker<S> {
    const STORAGE_KEY: &'static str = "tower_climber_statistics";

    pub fn load(storage: S) -> Self {
        let stats = persistence::load_json(&storage, Self::STORAGE_KEY).unwrap_or_default();
        Self { storage, stats }
    }

    pub fn stats(&self) -> &GameStatistics {
        &self.stats
    }

    fn save(&self) {
        persistence::save_json(&self.storage, Self::STORAGE_KEY, &self.stats);
    }
}

impl<S: Storage> StatisticsSink for StatisticsTracker<S> {
    fn record_success(&mut self, score: u64) {
        self.stats.total_successful_jumps += 1;
        self.stats.total_score += score;
        self.save();
    }

    fn record_miss(&mut self) {
        self.stats.total_missed_jumps += 1;
        self.save();
    }

    fn record_game(&mut self, floor: u32, score: u64, combo: u32) {
        let stats = &mut self.stats;
        stats.total_games += 1;
        stats.total_floors += floor as u64;
        stats.highest_floor = stats.highest_floor.max(floor);
        stats.highest_score = stats.highest_score.max(score);
        stats.longest_combo = stats.longest_combo.max(combo);
        log::info!(
            "Game #{} recorded: floor {floor}, score {score}, combo {combo}",
            stats.total_games
        );
        self.save();
    }

    fn record_play_time(&mut self, seconds: f64) {
        if !(seconds > 0.0) {
            return;
        }
        self.stats.total_play_time += seconds;
        self.save();
    }

    fn total_games(&self) -> u32 {
        self.stats.total_games
    }
}
