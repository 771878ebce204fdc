//! Frame-driven host for a jump session
//!
//! Converts variable frame times into fixed simulation ticks and latches
//! button presses until a tick consumes them.

use crate::consts::*;
use crate::error::WorldError;
use crate::sim::{GameEvent, JumpSession, Snapshot, TickInput};

pub struct FixedStepHost {
    session: JumpSession,
    accumulator: f32,
    input: TickInput,
    /// Events drained from the session, oldest first
    events: Vec<GameEvent>,
}

impl FixedStepHost {
    pub fn new(session: JumpSession) -> Self {
        Self {
            session,
            accumulator: 0.0,
            input: TickInput::default(),
            events: Vec::new(),
        }
    }

    /// Jump on the next tick
    pub fn press_jump(&mut self) {
        self.input.jump = true;
    }

    pub fn press_retry(&mut self) {
        self.input.retry = true;
    }

    pub fn press_exit(&mut self) {
        self.input.exit = true;
    }

    /// Idle mode stays on until switched off
    pub fn set_idle(&mut self, idle: bool) {
        if self.input.idle_mode != idle {
            log::info!("Idle mode: {idle}");
        }
        self.input.idle_mode = idle;
    }

    pub fn is_idle(&self) -> bool {
        self.input.idle_mode
    }

    /// Run as many fixed ticks as the frame time allows.
    ///
    /// Returns the number of ticks run.
    pub fn update(&mut self, frame_dt: f32) -> Result<u32, WorldError> {
        if self.session.is_torn_down() {
            self.accumulator = 0.0;
            return Ok(0);
        }

        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.clone();
            self.session.tick(&input, SIM_DT)?;
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.jump = false;
            self.input.retry = false;
            self.input.exit = false;

            self.events.append(&mut self.session.drain_events());

            if self.session.is_torn_down() {
                self.accumulator = 0.0;
                break;
            }
        }

        Ok(substeps)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn session(&self) -> &JumpSession {
        &self.session
    }

    pub fn is_running(&self) -> bool {
        !self.session.is_torn_down()
    }
}
