//! Climb progress store
//!
//! Tracks the current run and personal bests. Writes to storage only when the
//! session asks for it (`save_progress` / `reset_progress`), never per field.

use serde::{Deserialize, Serialize};

use crate::consts::{START_FLOOR, START_SCORE};
use crate::highscores::{self, HighScores};
use crate::persistence::{self, Storage};
use crate::services::ScoreStore;

/// Persisted progress record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedProgress {
    pub current_floor: u32,
    pub current_score: u64,
    pub best_floor: u32,
    pub best_score: u64,
    #[serde(default)]
    pub total_floors_climbed: u64,
}

impl Default for SavedProgress {
    fn default() -> Self {
        Self {
            current_floor: START_FLOOR,
            current_score: START_SCORE,
            best_floor: START_FLOOR,
            best_score: START_SCORE,
            total_floors_climbed: 0,
        }
    }
}

/// [`ScoreStore`] persisted through a key-value [`Storage`]
#[derive(Debug, Clone)]
pub struct ProgressStore<S: Storage> {
    storage: S,
    progress: SavedProgress,
    high_scores: HighScores,
}

impl<S: Storage> ProgressStore<S> {
    const STORAGE_KEY: &'static str = "tower_climber_progress";

    /// Load saved progress, starting fresh if nothing usable is stored
    pub fn load(storage: S) -> Self {
        let progress = match persistence::load_json::<SavedProgress>(&storage, Self::STORAGE_KEY) {
            Some(progress) => {
                log::info!(
                    "Resuming at floor {} (best {})",
                    progress.current_floor,
                    progress.best_floor
                );
                progress
            }
            None => SavedProgress::default(),
        };
        let high_scores = HighScores::load(&storage);
        Self {
            storage,
            progress,
            high_scores,
        }
    }

    pub fn progress(&self) -> &SavedProgress {
        &self.progress
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }
}

impl<S: Storage> ScoreStore for ProgressStore<S> {
    fn add_score(&mut self, delta: u64) {
        self.progress.current_score += delta;
        self.progress.best_score = self.progress.best_score.max(self.progress.current_score);
    }

    fn climb_floor(&mut self) {
        self.progress.current_floor += 1;
        self.progress.total_floors_climbed += 1;
        self.progress.best_floor = self.progress.best_floor.max(self.progress.current_floor);
    }

    fn save_progress(&mut self) {
        let SavedProgress {
            current_floor,
            current_score,
            ..
        } = self.progress;
        if let Some(rank) = self
            .high_scores
            .add_score(current_score, current_floor, highscores::now_ms())
        {
            log::info!("New high score #{rank}: {current_score} on floor {current_floor}");
            self.high_scores.save(&self.storage);
        }
        if persistence::save_json(&self.storage, Self::STORAGE_KEY, &self.progress) {
            log::info!("Progress saved (floor {current_floor}, score {current_score})");
        }
    }

    fn reset_progress(&mut self) {
        self.progress.current_floor = START_FLOOR;
        self.progress.current_score = START_SCORE;
        persistence::save_json(&self.storage, Self::STORAGE_KEY, &self.progress);
    }

    fn current_floor(&self) -> u32 {
        self.progress.current_floor
    }

    fn current_score(&self) -> u64 {
        self.progress.current_score
    }

    fn best_score(&self) -> u64 {
        self.progress.best_score
    }

    fn best_floor(&self) -> u32 {
        self.progress.best_floor
    }
}
