use log::{debug, trace};
use rand::Rng;
use std::time::Instant;

use crate::config::Config;
use crate::effects::{PULSE_FRAME, Pulses};
use crate::game::{GameState, StepOutcome};
use crate::input::Command;
use crate::scheduler::{Scheduler, TimerKey};

/// Drives one game: input commands and timers come in, state changes out.
///
/// The tick timer is armed for the whole lifetime of the session. Ticks that
/// land while the game is not running only re-arm themselves, so a resumed
/// or restarted game picks the chain up without a second timer appearing.
pub struct Session<R> {
    pub config: Config,
    pub game: GameState,
    pub pulses: Pulses,
    timers: Scheduler,
    rng: R,
}

impl<R: Rng> Session<R> {
    pub fn new(config: Config, mut rng: R, now: Instant) -> Self {
        let game = GameState::new(&config, &mut rng);
        let mut timers = Scheduler::new();
        timers.schedule_in(TimerKey::Tick, now, config.speed_levels.interval(game.speed));
        Self {
            config,
            game,
            pulses: Pulses::default(),
            timers,
            rng,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    #[cfg(test)]
    pub fn timers(&self) -> &Scheduler {
        &self.timers
    }

    /// Applies an input command. Returns true when something visible changed.
    pub fn handle(&mut self, command: Command, now: Instant) -> bool {
        trace!("command {:?}", command);
        match command {
            Command::Direction(dir) => self.game.change_dir(dir),
            Command::StartGame => {
                if !self.game.start() {
                    return false;
                }
                // First move happens right away instead of after a full interval.
                self.timers.schedule(TimerKey::Tick, now);
                true
            }
            Command::TogglePause => self.game.toggle_pause(),
            Command::SetSpeed(speed) => {
                // The tick in flight keeps its deadline.
                self.game.set_speed(speed);
                true
            }
        }
    }

    /// Fires every timer due at `now`. Returns true when a redraw is needed.
    pub fn advance(&mut self, now: Instant) -> bool {
        let mut dirty = false;
        for key in self.timers.pop_due(now) {
            dirty |= match key {
                TimerKey::Tick => self.on_tick(now),
                TimerKey::GameOverReset => self.on_reset(),
                TimerKey::FoodPulse => self.on_pulse(now),
            };
        }
        dirty
    }

    fn on_tick(&mut self, now: Instant) -> bool {
        let outcome = self.game.step(&mut self.rng);
        let interval = self.config.speed_levels.interval(self.game.speed);
        self.timers.schedule_in(TimerKey::Tick, now, interval);

        match outcome {
            StepOutcome::Idle => false,
            StepOutcome::Moved => true,
            StepOutcome::Ate { at } => {
                self.pulses.spawn(at, self.config.food_size);
                if !self.timers.is_armed(TimerKey::FoodPulse) {
                    self.timers.schedule_in(TimerKey::FoodPulse, now, PULSE_FRAME);
                }
                true
            }
            StepOutcome::Died(_) => {
                self.timers
                    .schedule_in(TimerKey::GameOverReset, now, self.config.reset_delay());
                debug!("reset in {} ms", self.config.reset_delay_ms);
                true
            }
        }
    }

    fn on_reset(&mut self) -> bool {
        self.timers.cancel(TimerKey::FoodPulse);
        self.pulses.clear();
        self.game.reset(&mut self.rng);
        true
    }

    fn on_pulse(&mut self, now: Instant) -> bool {
        self.pulses.advance();
        if !self.pulses.is_empty() {
            self.timers.schedule_in(TimerKey::FoodPulse, now, PULSE_FRAME);
        }
        true
    }
}
