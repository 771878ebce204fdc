//! Tower Climber headless runner
//!
//! Plays the climb on autopilot for a fixed stretch of simulated time and
//! prints what happened. Usage:
//!
//! ```text
//! tower-climber [settings.json] [seed] [seconds] [restart|resume]
//! ```
//!
//! `RUST_LOG=debug` shows every jump and audio cue.

use std::process::ExitCode;

use tower_climber::consts::SIM_DT;
use tower_climber::highscores;
use tower_climber::persistence::MemoryStorage;
use tower_climber::progress::ProgressStore;
use tower_climber::services::Services;
use tower_climber::sim::{FailureCause, GameEvent, GamePhase, JumpSession, Outcome};
use tower_climber::statistics::StatisticsTracker;
use tower_climber::{FixedStepHost, RetryPolicy, Settings};

const DEFAULT_SEED: u64 = 0x70_3e_2c;
const DEFAULT_SECONDS: f32 = 120.0;

fn load_settings(path: Option<&str>) -> Result<Settings, String> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let json = std::fs::read_to_string(path).map_err(|e| format!("cannot read {path}: {e}"))?;
    Settings::from_json(&json).map_err(|e| format!("invalid settings in {path}: {e}"))
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Tower Climber (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut settings = match load_settings(args.first().map(String::as_str)) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    let seed = args
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED);
    let seconds = args
        .get(2)
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|s| *s > 0.0)
        .unwrap_or(DEFAULT_SECONDS);
    if let Some(arg) = args.get(3) {
        match RetryPolicy::from_str(arg) {
            Some(policy) => settings.retry_policy = policy,
            None => {
                eprintln!("unknown retry policy {arg:?} (expected restart or resume)");
                return ExitCode::FAILURE;
            }
        }
    }

    // Settings go through storage the same way the session's stores do
    let storage = MemoryStorage::new();
    settings.save(&storage);
    let settings = Settings::load(&storage);
    log::info!("Retry policy: {}", settings.retry_policy.as_str());
    let services = Services::with_storage(storage.clone(), &settings);
    let session = match JumpSession::new(settings, seed, services) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("cannot start session: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut host = FixedStepHost::new(session);
    host.set_idle(true);

    let mut landings = 0u32;
    let mut misses = 0u32;
    let mut collapses = 0u32;
    let mut attempts = 1u32;
    let mut elapsed = 0.0f32;
    while elapsed < seconds {
        if let Err(err) = host.update(SIM_DT) {
            eprintln!("simulation stopped: {err}");
            return ExitCode::FAILURE;
        }
        elapsed += SIM_DT;

        for event in host.drain_events() {
            match event {
                GameEvent::JumpLanded { .. } => landings += 1,
                GameEvent::JumpMissed { .. } => misses += 1,
                GameEvent::PlatformCollapsed { .. } => collapses += 1,
                GameEvent::PhaseChanged { from, to } if from.is_result() && !to.is_result() => {
                    attempts += 1
                }
                _ => {}
            }
        }
    }
    host.press_exit();
    if let Err(err) = host.update(SIM_DT) {
        eprintln!("simulation stopped: {err}");
        return ExitCode::FAILURE;
    }

    let snapshot = host.snapshot();
    println!("Simulated {seconds:.0}s with seed {seed}");
    println!("  attempts:   {attempts}");
    println!("  landings:   {landings}");
    println!("  misses:     {misses}");
    println!("  collapses:  {collapses}");
    println!(
        "  final:      floor {} / score {} / best combo {}",
        snapshot.floor, snapshot.score, snapshot.best_combo
    );
    if let GamePhase::Result(Outcome::TryAgain { cause }) = snapshot.phase {
        let cause = match cause {
            FailureCause::Miss => "missed jump",
            FailureCause::Collapse => "platform collapse",
        };
        println!("  ended on:   {cause}");
    }

    // Reload what the session persisted
    let progress = ProgressStore::load(storage.clone());
    let stats = StatisticsTracker::load(storage);
    println!(
        "  best:       floor {} / score {}",
        progress.progress().best_floor,
        progress.progress().best_score
    );
    println!(
        "  games:      {} ({:.1}% landed, longest combo {})",
        stats.stats().total_games,
        stats.stats().success_rate(),
        stats.stats().longest_combo
    );
    println!("  play time:  {}", stats.stats().formatted_play_time());
    let now = highscores::now_ms();
    for (rank, entry) in progress.high_scores().entries.iter().enumerate().take(3) {
        println!(
            "  #{:<2}        {} (floor {}, {})",
            rank + 1,
            entry.score,
            entry.floor,
            highscores::format_relative(entry.timestamp, now)
        );
    }

    ExitCode::SUCCESS
}
