//! Fixed timestep jump session
//!
//! `JumpSession` is the only owner of the game phase. Every state change
//! happens inside [`JumpSession::tick`] or one of the explicit transitions
//! (`retry`, `exit`), so the whole climb is a function of the seed, the
//! settings and the input sequence.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::{self, JumpOutcome};
use super::difficulty::cycle_duration;
use super::hazard::{HazardStep, HazardTimers};
use super::oscillator::TimingOscillator;
use super::platform::PlatformKind;
use super::state::{
    FailureCause, GameEvent, GamePhase, Outcome, PlatformView, Resolution, Snapshot,
};
use super::world::ScrollWorld;
use crate::consts::*;
use crate::error::{ConfigError, WorldError};
use crate::services::Services;
use crate::settings::{RetryPolicy, Settings};

/// Timers compare against whole durations; f32 sums of 1/60 drift by a few ulps
const TIMER_EPSILON: f32 = 1e-4;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump button (tap/space)
    pub jump: bool,
    /// "Try Again" on the result screen
    pub retry: bool,
    /// Leave the game; the session is torn down
    pub exit: bool,
    /// Idle/demo mode - the session plays itself
    pub idle_mode: bool,
}

/// One climb: countdown, jumps, result, retries
pub struct JumpSession {
    settings: Settings,
    services: Services,
    seed: u64,
    rng: Pcg32,
    phase: GamePhase,
    /// Visible countdown number
    countdown: u32,
    /// Seconds into the current countdown step
    countdown_timer: f32,
    /// Seconds into the current resolution
    resolve_timer: f32,
    oscillator: TimingOscillator,
    hazards: HazardTimers,
    world: ScrollWorld,
    floor: u32,
    score: u64,
    combo: u32,
    best_combo: u32,
    time_ticks: u64,
    /// Seconds played in the current attempt
    attempt_time: f32,
    /// Set once the attempt's result has gone to the store and statistics
    attempt_saved: bool,
    torn_down: bool,
    events: Vec<GameEvent>,
}

impl JumpSession {
    /// Start a session at the store's current floor and score
    pub fn new(settings: Settings, seed: u64, services: Services) -> Result<Self, ConfigError> {
        settings.validate()?;

        let floor = services.store.current_floor().max(START_FLOOR);
        let score = services.store.current_score();
        let mut session = Self {
            world: ScrollWorld::new(&settings),
            settings,
            services,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Countdown,
            countdown: COUNTDOWN_START,
            countdown_timer: 0.0,
            resolve_timer: 0.0,
            oscillator: TimingOscillator::default(),
            hazards: HazardTimers::default(),
            floor,
            score,
            combo: 0,
            best_combo: 0,
            time_ticks: 0,
            attempt_time: 0.0,
            attempt_saved: false,
            torn_down: false,
            events: Vec::new(),
        };
        session.begin_attempt();

        log::info!("Session started at floor {floor}, score {score} (seed {seed})");
        Ok(session)
    }

    /// Fresh platforms and timers for the current floor, then count down
    fn begin_attempt(&mut self) {
        self.world.initialize(self.floor, &mut self.rng);
        self.oscillator.reset();
        self.hazards.on_landed(PlatformKind::Normal, &self.settings);
        self.combo = 0;
        self.best_combo = 0;
        self.countdown = COUNTDOWN_START;
        self.countdown_timer = 0.0;
        self.resolve_timer = 0.0;
        self.attempt_time = 0.0;
        self.attempt_saved = false;
        self.set_phase(GamePhase::Countdown);
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {from:?} -> {to:?}");
        self.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    /// Advance the session by one fixed timestep
    pub fn tick(&mut self, input: &TickInput, dt: f32) -> Result<(), WorldError> {
        if self.torn_down {
            return Ok(());
        }
        if input.exit {
            self.exit();
            return Ok(());
        }

        self.time_ticks += 1;
        if !self.attempt_saved {
            self.attempt_time += dt;
        }

        match self.phase {
            GamePhase::Countdown => {
                if input.jump {
                    log::trace!("Jump ignored during countdown");
                }
                self.tick_countdown(dt);
            }
            GamePhase::Active => self.tick_active(input, dt)?,
            GamePhase::Resolving(resolution) => {
                if input.jump {
                    log::trace!("Jump ignored while resolving");
                }
                self.tick_resolving(resolution, dt);
            }
            GamePhase::Result(_) => {
                if input.retry || input.idle_mode {
                    self.retry();
                }
            }
        }

        Ok(())
    }

    fn tick_countdown(&mut self, dt: f32) {
        self.countdown_timer += dt;
        while self.countdown > 0 && self.countdown_timer + TIMER_EPSILON >= COUNTDOWN_STEP {
            self.countdown_timer = (self.countdown_timer - COUNTDOWN_STEP).max(0.0);
            self.countdown -= 1;
            self.services.audio.play_countdown();
            self.events.push(GameEvent::CountdownTick {
                remaining: self.countdown,
            });
        }
        if self.countdown == 0 {
            self.countdown_timer = 0.0;
            self.set_phase(GamePhase::Active);
        }
    }

    fn tick_active(&mut self, input: &TickInput, dt: f32) -> Result<(), WorldError> {
        // Timers first, then the jump that arrived this tick
        let cycle = cycle_duration(self.floor, &self.settings);
        self.oscillator.step(dt, cycle);
        self.world.set_target_x(self.oscillator.position);

        if self.hazards.step(dt, &self.settings) == HazardStep::Collapsed {
            if let Some(standing) = self.world.standing() {
                log::debug!("Platform {} collapsed on floor {}", standing.id, self.floor);
                self.events.push(GameEvent::PlatformCollapsed { id: standing.id });
            }
            self.fail(FailureCause::Collapse);
            return Ok(());
        }

        let jump = input.jump || (input.idle_mode && self.autopilot_wants_jump());
        if jump {
            self.jump()?;
        }
        Ok(())
    }

    fn tick_resolving(&mut self, resolution: Resolution, dt: f32) {
        let duration = match resolution {
            Resolution::Success => self.settings.success_resolve_duration,
            Resolution::Failure(_) => self.settings.failure_resolve_duration,
        };
        self.resolve_timer += dt;
        if self.resolve_timer + TIMER_EPSILON < duration {
            return;
        }
        self.resolve_timer = 0.0;

        match resolution {
            Resolution::Success => {
                self.oscillator.reset();
                self.world.set_target_x(self.oscillator.position);
                self.set_phase(GamePhase::Active);
            }
            Resolution::Failure(cause) => {
                self.set_phase(GamePhase::Result(Outcome::TryAgain { cause }));
            }
        }
    }

    /// Evaluate a jump against the current target position
    fn jump(&mut self) -> Result<(), WorldError> {
        self.services.audio.play_tap();

        let kind = self.hazards.standing();
        let lateral = self.hazards.sway.normalized(self.settings.track_width_px);
        let position = self.oscillator.position;

        match collision::evaluate(position, kind, lateral, &self.settings) {
            JumpOutcome::Hit => self.land(position),
            JumpOutcome::Miss => {
                log::debug!("Missed at {position:.3} on floor {} ({kind:?})", self.floor);
                self.events.push(GameEvent::JumpMissed {
                    position,
                    floor: self.floor,
                });
                self.fail(FailureCause::Miss);
                Ok(())
            }
        }
    }

    fn land(&mut self, position: f32) -> Result<(), WorldError> {
        let Some(target_kind) = self.world.target().map(|p| p.kind) else {
            let err = WorldError::MissingTarget {
                current_index: self.world.current_index(),
                len: self.world.platforms().len(),
            };
            log::error!("{err}");
            return Err(err);
        };

        // The only fallible step goes first so a rejected advance leaves the
        // session untouched.
        let report = self.world.advance(position, target_kind, &mut self.rng)?;

        let delta = self.settings.score_for_floor(self.floor);
        self.score += delta;
        self.floor += 1;
        self.combo += 1;
        self.best_combo = self.best_combo.max(self.combo);

        let services = &mut self.services;
        services.store.add_score(delta);
        services.store.climb_floor();
        services.statistics.record_success(self.score);
        let total_games = services.statistics.total_games();
        services
            .achievements
            .check_achievements(self.floor, self.score, self.combo, total_games);

        self.hazards.on_landed(target_kind, &self.settings);
        self.services.audio.play_success();

        log::debug!(
            "Landed on floor {} ({target_kind:?}) at {position:.3}: +{delta}, combo {}",
            self.floor,
            self.combo
        );
        self.events.push(GameEvent::JumpLanded {
            floor: self.floor,
            score_delta: delta,
            combo: self.combo,
        });
        if !report.evicted.is_empty() {
            self.events.push(GameEvent::PlatformsEvicted {
                ids: report.evicted,
            });
        }

        self.resolve_timer = 0.0;
        self.set_phase(GamePhase::Resolving(Resolution::Success));
        Ok(())
    }

    /// End the attempt: report the final numbers and persist progress
    fn fail(&mut self, cause: FailureCause) {
        self.services.audio.play_miss();

        let final_combo = self.combo;
        self.combo = 0;

        let services = &mut self.services;
        if cause == FailureCause::Miss {
            services.statistics.record_miss();
        }
        services
            .statistics
            .record_game(self.floor, self.score, final_combo);
        let total_games = services.statistics.total_games();
        services
            .achievements
            .check_achievements(self.floor, self.score, final_combo, total_games);
        services.statistics.record_play_time(self.attempt_time as f64);
        services.store.save_progress();
        self.attempt_saved = true;

        log::info!(
            "Attempt over ({cause:?}) on floor {} with score {}",
            self.floor,
            self.score
        );
        self.resolve_timer = 0.0;
        self.set_phase(GamePhase::Resolving(Resolution::Failure(cause)));
    }

    /// Autopilot: jump once the target is well inside the window.
    ///
    /// How deep inside varies slowly with time, and sometimes exceeds the
    /// window, so demo runs miss now and then.
    fn autopilot_wants_jump(&self) -> bool {
        let kind = self.hazards.standing();
        let lateral = self.hazards.sway.normalized(self.settings.track_width_px);
        let effective = collision::effective_position(self.oscillator.position, kind, lateral);
        let tolerance = collision::tolerance_for(kind, &self.settings);

        let t = self.time_ticks as f32 * 0.013;
        let sloppiness = (t.sin() + (t * 0.37).sin()) * 0.25 + 0.5;
        let reach = tolerance * (0.3 + 0.85 * sloppiness);
        (effective - PLAYER_POSITION).abs() < reach
    }

    /// Leave the result screen and count down again.
    ///
    /// Returns false when there is nothing to retry.
    pub fn retry(&mut self) -> bool {
        if self.torn_down || !self.phase.is_result() {
            log::trace!("Retry ignored in {:?}", self.phase);
            return false;
        }

        match self.settings.retry_policy {
            RetryPolicy::Restart => {
                self.services.store.reset_progress();
                self.floor = START_FLOOR;
                self.score = START_SCORE;
            }
            RetryPolicy::Resume => {}
        }
        log::info!(
            "Retry ({}) from floor {} with score {}",
            self.settings.retry_policy.as_str(),
            self.floor,
            self.score
        );
        self.begin_attempt();
        true
    }

    /// Tear the session down; later ticks do nothing
    pub fn exit(&mut self) {
        if self.torn_down {
            return;
        }
        if !self.attempt_saved {
            let services = &mut self.services;
            services.statistics.record_play_time(self.attempt_time as f64);
            services.store.save_progress();
            self.attempt_saved = true;
        }
        self.torn_down = true;
        log::info!("Session exited on floor {} with score {}", self.floor, self.score);
    }

    /// Presentation view of the current state
    pub fn snapshot(&self) -> Snapshot {
        let current = self.world.current_index();
        let scroll_offset = self.world.scroll_offset();
        let track = self.settings.track_width_px;
        let standing_kind = self.hazards.standing();
        let lateral = self.hazards.sway.normalized(track);
        let platforms = self
            .world
            .platforms()
            .iter()
            .enumerate()
            .map(|(i, p)| {
                // Draw the target where the hit test sees it
                let x = if p.is_target {
                    collision::effective_position(p.x, standing_kind, lateral)
                } else {
                    p.x
                };
                PlatformView {
                    id: p.id,
                    kind: p.kind,
                    screen: glam::Vec2::new(x * track, p.screen_y(scroll_offset)),
                    is_target: p.is_target,
                    is_standing: i == current,
                }
            })
            .collect();

        Snapshot {
            phase: self.phase,
            countdown: self.countdown,
            floor: self.floor,
            score: self.score,
            combo: self.combo,
            best_combo: self.best_combo,
            oscillator_position: self.oscillator.position,
            oscillator_direction: self.oscillator.direction,
            lateral_offset: self.hazards.sway.offset,
            breaking_progress: self.hazards.breaking.progress(),
            scroll_offset,
            platforms,
            time_ticks: self.time_ticks,
        }
    }

    /// Take the events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn floor(&self) -> u32 {
        self.floor
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn best_combo(&self) -> u32 {
        self.best_combo
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Seconds played in the current attempt
    pub fn attempt_time(&self) -> f32 {
        self.attempt_time
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn world(&self) -> &ScrollWorld {
        &self.world
    }

    pub fn oscillator(&self) -> &TimingOscillator {
        &self.oscillator
    }

    pub fn hazards(&self) -> &HazardTimers {
        &self.hazards
    }

    pub fn services(&self) -> &Services {
        &self.services
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioSink, SoundEffect};
    use crate::services::{AchievementEvaluator, ScoreStore, StatisticsSink};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        AddScore(u64),
        ClimbFloor,
        Save,
        Reset,
        Success(u64),
        Miss,
        Game(u32, u64, u32),
        Achievements(u32, u64, u32),
        Sound(SoundEffect),
    }

    #[derive(Debug, Default)]
    struct Log {
        calls: Vec<Call>,
        floor: u32,
        score: u64,
        games: u32,
        play_time: f64,
    }

    /// Stands in for every collaborator and records what it was told
    #[derive(Clone)]
    struct Recorder(Rc<RefCell<Log>>);

    impl Recorder {
        fn new(floor: u32, score: u64) -> Self {
            Self(Rc::new(RefCell::new(Log {
                floor,
                score,
                ..Default::default()
            })))
        }

        fn push(&self, call: Call) {
            self.0.borrow_mut().calls.push(call);
        }

        fn calls(&self) -> Vec<Call> {
            self.0.borrow().calls.clone()
        }

        fn count(&self, call: &Call) -> usize {
            self.0.borrow().calls.iter().filter(|c| *c == call).count()
        }

        fn clear(&self) {
            self.0.borrow_mut().calls.clear();
        }

        fn play_time(&self) -> f64 {
            self.0.borrow().play_time
        }

        fn services(&self) -> Services {
            Services {
                store: Box::new(self.clone()),
                statistics: Box::new(self.clone()),
                achievements: Box::new(self.clone()),
                audio: Box::new(self.clone()),
            }
        }
    }

    impl ScoreStore for Recorder {
        fn add_score(&mut self, delta: u64) {
            self.0.borrow_mut().score += delta;
            self.push(Call::AddScore(delta));
        }
        fn climb_floor(&mut self) {
            self.0.borrow_mut().floor += 1;
            self.push(Call::ClimbFloor);
        }
        fn save_progress(&mut self) {
            self.push(Call::Save);
        }
        fn reset_progress(&mut self) {
            let mut log = self.0.borrow_mut();
            log.floor = 1;
            log.score = 0;
            log.calls.push(Call::Reset);
        }
        fn current_floor(&self) -> u32 {
            self.0.borrow().floor
        }
        fn current_score(&self) -> u64 {
            self.0.borrow().score
        }
        fn best_score(&self) -> u64 {
            self.0.borrow().score
        }
        fn best_floor(&self) -> u32 {
            self.0.borrow().floor
        }
    }

    impl StatisticsSink for Recorder {
        fn record_success(&mut self, score: u64) {
            self.push(Call::Success(score));
        }
        fn record_miss(&mut self) {
            self.push(Call::Miss);
        }
        fn record_game(&mut self, floor: u32, score: u64, combo: u32) {
            self.0.borrow_mut().games += 1;
            self.push(Call::Game(floor, score, combo));
        }
        fn record_play_time(&mut self, seconds: f64) {
            self.0.borrow_mut().play_time += seconds;
        }
        fn total_games(&self) -> u32 {
            self.0.borrow().games
        }
    }

    impl AchievementEvaluator for Recorder {
        fn check_achievements(&mut self, floor: u32, score: u64, combo: u32, _total_games: u32) {
            self.push(Call::Achievements(floor, score, combo));
        }
    }

    impl AudioSink for Recorder {
        fn play(&mut self, effect: SoundEffect) {
            self.push(Call::Sound(effect));
        }
    }

    fn session(settings: Settings) -> (JumpSession, Recorder) {
        let recorder = Recorder::new(1, 0);
        let session = JumpSession::new(settings, 42, recorder.services()).expect("valid settings");
        (session, recorder)
    }

    /// Skip the countdown with three exact one-second ticks
    fn activate(session: &mut JumpSession) {
        for _ in 0..COUNTDOWN_START {
            session.tick(&TickInput::default(), COUNTDOWN_STEP).expect("tick");
        }
        assert_eq!(session.phase(), GamePhase::Active);
    }

    fn jump() -> TickInput {
        TickInput {
            jump: true,
            ..Default::default()
        }
    }

    fn run(session: &mut JumpSession, input: &TickInput, seconds: f32) {
        let ticks = (seconds / SIM_DT).round() as u32;
        for _ in 0..ticks {
            session.tick(input, SIM_DT).expect("tick");
        }
    }

    #[test]
    fn test_countdown_to_active() {
        let (mut session, recorder) = session(Settings::default());
        assert_eq!(session.phase(), GamePhase::Countdown);
        assert_eq!(session.countdown(), 3);

        run(&mut session, &TickInput::default(), 2.5);
        assert_eq!(session.phase(), GamePhase::Countdown);
        assert_eq!(session.countdown(), 1);

        run(&mut session, &TickInput::default(), 0.5);
        assert_eq!(session.phase(), GamePhase::Active);
        assert_eq!(session.countdown(), 0);
        assert_eq!(recorder.count(&Call::Sound(SoundEffect::Countdown)), 3);

        let ticks: Vec<u32> = session
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::CountdownTick { remaining } => Some(remaining),
                _ => None,
            })
            .collect();
        assert_eq!(ticks, vec![2, 1, 0]);
    }

    #[test]
    fn test_jump_ignored_during_countdown() {
        let (mut session, recorder) = session(Settings::default());
        session.tick(&jump(), SIM_DT).expect("tick");
        assert_eq!(session.phase(), GamePhase::Countdown);
        assert_eq!(recorder.count(&Call::Sound(SoundEffect::Tap)), 0);
        // Oscillator does not move before the climb starts
        assert_eq!(session.oscillator().position, 0.0);
    }

    #[test]
    fn test_centered_jump_climbs_one_floor() {
        let (mut session, recorder) = session(Settings::default());
        activate(&mut session);
        recorder.clear();

        // Floor 1 cycle is 2.5s, so 0.625s puts the target exactly on center
        session.tick(&jump(), 0.625).expect("tick");

        assert_eq!(session.phase(), GamePhase::Resolving(Resolution::Success));
        assert_eq!(session.floor(), 2);
        assert_eq!(session.score(), 15);
        assert_eq!(session.combo(), 1);
        assert_eq!(
            recorder.calls(),
            vec![
                Call::Sound(SoundEffect::Tap),
                Call::AddScore(15),
                Call::ClimbFloor,
                Call::Success(15),
                Call::Achievements(2, 15, 1),
                Call::Sound(SoundEffect::Success),
            ]
        );

        // The landed platform is now the standing one, caught at center
        let standing = session.world().standing().expect("standing");
        assert_eq!(standing.x, 0.5);
        assert_eq!(session.world().scroll_offset(), 120.0);
    }

    #[test]
    fn test_success_resolves_back_to_active() {
        let (mut session, _recorder) = session(Settings::default());
        activate(&mut session);
        session.tick(&jump(), 0.625).expect("tick");

        // Input is locked while resolving
        session.tick(&jump(), 0.1).expect("tick");
        assert_eq!(session.floor(), 2);

        session.tick(&TickInput::default(), 0.7).expect("tick");
        assert_eq!(session.phase(), GamePhase::Active);
        assert_eq!(session.oscillator().position, 0.0);
        assert_eq!(session.world().target().map(|p| p.x), Some(0.0));
    }

    #[test]
    fn test_miss_resets_combo_and_reaches_result() {
        let (mut session, recorder) = session(Settings::default());
        activate(&mut session);
        session.combo = 5;
        session.oscillator.position = 0.95;
        recorder.clear();

        // Zero dt: evaluate exactly where the target is
        session.tick(&jump(), 0.0).expect("tick");

        assert_eq!(
            session.phase(),
            GamePhase::Resolving(Resolution::Failure(FailureCause::Miss))
        );
        assert_eq!(session.combo(), 0);
        assert_eq!(session.floor(), 1);
        assert_eq!(
            recorder.calls(),
            vec![
                Call::Sound(SoundEffect::Tap),
                Call::Sound(SoundEffect::Miss),
                Call::Miss,
                Call::Game(1, 0, 5),
                Call::Achievements(1, 0, 5),
                Call::Save,
            ]
        );

        run(&mut session, &TickInput::default(), 1.0);
        assert_eq!(
            session.phase(),
            GamePhase::Result(Outcome::TryAgain {
                cause: FailureCause::Miss
            })
        );

        // No automatic retry
        run(&mut session, &TickInput::default(), 5.0);
        assert!(session.phase().is_result());
    }

    #[test]
    fn test_breaking_platform_collapses() {
        let settings = Settings::default();
        let (mut session, recorder) = session(settings.clone());
        activate(&mut session);
        session.hazards.on_landed(PlatformKind::Breaking, &settings);
        recorder.clear();

        run(&mut session, &TickInput::default(), 1.9);
        assert_eq!(session.phase(), GamePhase::Active);

        run(&mut session, &TickInput::default(), 0.2);
        assert_eq!(
            session.phase(),
            GamePhase::Resolving(Resolution::Failure(FailureCause::Collapse))
        );
        // A collapse is not a missed jump
        assert_eq!(recorder.count(&Call::Miss), 0);
        assert_eq!(recorder.count(&Call::Save), 1);
        assert!(
            session
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::PlatformCollapsed { .. }))
        );

        run(&mut session, &TickInput::default(), 1.0);
        assert_eq!(
            session.phase(),
            GamePhase::Result(Outcome::TryAgain {
                cause: FailureCause::Collapse
            })
        );
    }

    #[test]
    fn test_retry_restart_policy() {
        let (mut session, recorder) = session(Settings::default());
        activate(&mut session);
        session.tick(&jump(), 0.625).expect("tick");
        run(&mut session, &TickInput::default(), 0.8);
        session.oscillator.position = 0.0;
        session.tick(&jump(), 0.0).expect("tick");
        run(&mut session, &TickInput::default(), 1.0);
        assert!(session.phase().is_result());

        let retry = TickInput {
            retry: true,
            ..Default::default()
        };
        session.tick(&retry, SIM_DT).expect("tick");
        assert_eq!(session.phase(), GamePhase::Countdown);
        assert_eq!(session.countdown(), 3);
        assert_eq!(session.floor(), 1);
        assert_eq!(session.score(), 0);
        assert_eq!(recorder.count(&Call::Reset), 1);
    }

    #[test]
    fn test_retry_resume_policy_keeps_floor() {
        let settings = Settings {
            retry_policy: RetryPolicy::Resume,
            ..Default::default()
        };
        let (mut session, recorder) = session(settings);
        activate(&mut session);
        session.tick(&jump(), 0.625).expect("tick");
        run(&mut session, &TickInput::default(), 0.8);
        session.oscillator.position = 1.0;
        session.tick(&jump(), 0.0).expect("tick");
        run(&mut session, &TickInput::default(), 1.0);

        assert!(session.retry());
        assert_eq!(session.floor(), 2);
        assert_eq!(session.score(), 15);
        assert_eq!(recorder.count(&Call::Reset), 0);
        // Not on the result screen any more
        assert!(!session.retry());
    }

    #[test]
    fn test_exit_tears_down() {
        let (mut session, recorder) = session(Settings::default());
        activate(&mut session);
        let exit = TickInput {
            exit: true,
            ..Default::default()
        };
        session.tick(&exit, SIM_DT).expect("tick");
        assert!(session.is_torn_down());
        assert_eq!(recorder.count(&Call::Save), 1);

        let ticks = session.time_ticks();
        let position = session.oscillator().position;
        run(&mut session, &jump(), 1.0);
        assert_eq!(session.time_ticks(), ticks);
        assert_eq!(session.oscillator().position, position);
        assert_eq!(session.floor(), 1);
    }

    #[test]
    fn test_starts_from_store_progress() {
        let recorder = Recorder::new(12, 400);
        let session =
            JumpSession::new(Settings::default(), 7, recorder.services()).expect("valid settings");
        assert_eq!(session.floor(), 12);
        assert_eq!(session.score(), 400);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = Settings {
            platform_spacing: 0.0,
            ..Default::default()
        };
        let recorder = Recorder::new(1, 0);
        assert!(matches!(
            JumpSession::new(settings, 1, recorder.services()),
            Err(ConfigError::NotPositive { .. })
        ));
    }

    #[test]
    fn test_snapshot_layout() {
        let (mut session, _recorder) = session(Settings::default());
        activate(&mut session);
        session.tick(&TickInput::default(), 0.625).expect("tick");

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, GamePhase::Active);
        assert_eq!(snapshot.oscillator_position, 0.5);
        let standing = snapshot.standing().expect("standing");
        let target = snapshot.target().expect("target");
        assert_eq!(standing.screen.y, 225.0);
        assert_eq!(target.screen.y, 105.0);
        assert_eq!(target.screen.x, 140.0);
        assert_eq!(snapshot.platforms.iter().filter(|p| p.is_target).count(), 1);
    }

    #[test]
    fn test_moving_sway_drawn_where_hit_test_sees_it() {
        let settings = Settings::default();
        let track = settings.track_width_px;
        let player_px = PLAYER_POSITION * track;
        let window_px = collision::tolerance_for(PlatformKind::Moving, &settings) * track;

        for sway in [30.0, -30.0] {
            let (mut session, _recorder) = session(settings.clone());
            activate(&mut session);
            session.hazards.on_landed(PlatformKind::Moving, &settings);
            session.hazards.sway.offset = sway;
            session.oscillator.position = 0.2;
            session.tick(&TickInput::default(), 0.0).expect("tick");

            let snapshot = session.snapshot();
            // The player's own platform never drifts away from the player
            let standing = snapshot.standing().expect("standing");
            assert_eq!(standing.screen.x, player_px);
            let target = snapshot.target().expect("target");
            let drawn_inside = (target.screen.x - player_px).abs() < window_px;

            session.tick(&jump(), 0.0).expect("tick");
            let landed = session.phase() == GamePhase::Resolving(Resolution::Success);
            assert_eq!(drawn_inside, landed, "sway {sway}");
            assert_eq!(landed, sway > 0.0, "sway {sway}");
        }
    }

    #[test]
    fn test_exit_while_failing_saves_once() {
        let (mut session, recorder) = session(Settings::default());
        activate(&mut session);
        run(&mut session, &TickInput::default(), 0.5);
        session.oscillator.position = 0.95;
        session.tick(&jump(), 0.0).expect("tick");
        assert_eq!(
            session.phase(),
            GamePhase::Resolving(Resolution::Failure(FailureCause::Miss))
        );

        session.exit();
        assert!(session.is_torn_down());
        assert_eq!(recorder.count(&Call::Save), 1);
        // Countdown plus half a second of climbing, counted once
        assert!((recorder.play_time() - 3.5).abs() < 1e-3);
    }

    #[test]
    fn test_play_time_restarts_with_each_attempt() {
        let (mut session, recorder) = session(Settings::default());
        activate(&mut session);
        session.oscillator.position = 0.0;
        session.tick(&jump(), 0.0).expect("tick");
        // Time spent resolving the failure is not play time
        run(&mut session, &TickInput::default(), 1.0);
        assert!(session.retry());
        assert_eq!(session.attempt_time(), 0.0);
        assert!((recorder.play_time() - 3.0).abs() < 1e-3);
    }

    /// Floor 40 rolls hazards; find a seed whose first target is Breaking
    fn session_with_breaking_target() -> (JumpSession, Recorder) {
        (0..1_000u64)
            .find_map(|seed| {
                let recorder = Recorder::new(40, 0);
                let session = JumpSession::new(Settings::default(), seed, recorder.services())
                    .expect("valid settings");
                let target = session.world().target().map(|p| p.kind);
                (target == Some(PlatformKind::Breaking)).then_some((session, recorder))
            })
            .expect("a seed with a breaking target")
    }

    #[test]
    fn test_landing_on_breaking_platform_starts_countdown() {
        let (mut session, _recorder) = session_with_breaking_target();
        activate(&mut session);
        session.oscillator.position = 0.5;
        session.tick(&jump(), 0.0).expect("tick");

        assert_eq!(session.phase(), GamePhase::Resolving(Resolution::Success));
        assert_eq!(session.hazards().standing(), PlatformKind::Breaking);
        assert_eq!(session.snapshot().breaking_progress, Some(0.0));

        // The countdown holds while the landing resolves
        run(&mut session, &TickInput::default(), 0.8);
        assert_eq!(session.phase(), GamePhase::Active);
        assert_eq!(session.hazards().breaking.progress(), Some(0.0));

        run(&mut session, &TickInput::default(), 1.9);
        assert_eq!(session.phase(), GamePhase::Active);
        run(&mut session, &TickInput::default(), 0.2);
        assert_eq!(
            session.phase(),
            GamePhase::Resolving(Resolution::Failure(FailureCause::Collapse))
        );
    }

    #[test]
    fn test_jumping_off_breaking_platform_cancels_countdown() {
        let (mut session, _recorder) = session_with_breaking_target();
        activate(&mut session);
        session.oscillator.position = 0.5;
        session.tick(&jump(), 0.0).expect("tick");
        run(&mut session, &TickInput::default(), 0.8);
        run(&mut session, &TickInput::default(), 1.0);
        let half = session.hazards().breaking.progress().expect("counting down");
        assert!(half > 0.4);

        session.oscillator.position = 0.5;
        session.tick(&jump(), 0.0).expect("tick");
        assert_eq!(session.phase(), GamePhase::Resolving(Resolution::Success));
        // Gone, or restarted from zero if the next platform breaks too
        assert!(session.hazards().breaking.progress().unwrap_or(0.0) == 0.0);

        // Well past the moment the old platform would have collapsed
        run(&mut session, &TickInput::default(), 0.8);
        run(&mut session, &TickInput::default(), 1.5);
        assert_eq!(session.phase(), GamePhase::Active);
    }

    #[test]
    fn test_determinism() {
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let (mut a, _) = session(Settings::default());
        let (mut b, _) = session(Settings::default());
        run(&mut a, &input, 60.0);
        run(&mut b, &input, 60.0);
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_autopilot_climbs() {
        let (mut session, _recorder) = session(Settings::default());
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        run(&mut session, &input, 30.0);
        let landed = session
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::JumpLanded { .. }))
            .count();
        assert!(landed > 0);
    }
}
