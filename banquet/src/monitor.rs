//! # Table Monitors
//!
//! Two background watchers end a run: the death monitor, which checks
//! every seat against the starvation timeout, and the satiety monitor,
//! which looks for a full pass of philosophers at or above the meal
//! target. Whichever observes its condition first wins the shutdown
//! latch; the loser notices the flipped latch and goes quiet.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::event::TableEvent;
use crate::philosopher::{Philosopher, PhilosopherState};
use crate::runtime::Shared;
use crate::shutdown::Outcome;

/// Poll cadence of both monitors.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Watches every philosopher for a missed starvation deadline.
pub(crate) struct DeathMonitor {
    shared: Arc<Shared>,
}

impl DeathMonitor {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Scan the table until a death is declared or the run ends some
    /// other way. A philosopher mid-meal is never declared dead, even if
    /// the wall clock says it crossed the deadline.
    pub(crate) fn run(self) {
        let timeout_ms = self.shared.config.time_to_die.as_millis() as u64;
        loop {
            for philosopher in &self.shared.philosophers {
                if !self.shared.latch.is_running() {
                    debug!("death monitor stopping: shutdown already requested");
                    return;
                }
                let now = self.shared.clock.now_ms();
                let starving = philosopher.ms_since_meal(now) > timeout_ms;
                if starving && philosopher.state() != PhilosopherState::Eating {
                    self.declare_death(philosopher);
                    return;
                }
            }
            self.shared.clock.wait(POLL_INTERVAL);
        }
    }

    /// Declare one starvation, exactly once for the whole run.
    ///
    /// The `died` line is emitted after the latch flips, so every other
    /// emitter is already silenced and the line is always last.
    fn declare_death(&self, philosopher: &Philosopher) {
        if !philosopher.mark_dead() {
            return;
        }
        let id = philosopher.id();
        if self.shared.halt(Outcome::Death { philosopher: id }) {
            self.shared.events.emit_final(id, TableEvent::Died);
            info!(id, "philosopher starved; shutting the table down");
        }
    }
}

/// Watches for every philosopher reaching the meal target.
pub(crate) struct SatietyMonitor {
    shared: Arc<Shared>,
    target: u32,
}

impl SatietyMonitor {
    pub(crate) fn new(shared: Arc<Shared>, target: u32) -> Self {
        Self { shared, target }
    }

    /// Step one seat per poll interval; any seat below the target sends
    /// the walk back to seat zero. Meal counters only grow, so a seat
    /// that passed once stays passed and the walk eventually completes
    /// one unbroken pass.
    pub(crate) fn run(self) {
        let seats = self.shared.philosophers.len();
        let mut index = 0;
        while index < seats {
            if !self.shared.latch.is_running() {
                debug!("satiety monitor stopping: shutdown already requested");
                return;
            }
            self.shared.clock.wait(POLL_INTERVAL);
            if self.shared.philosophers[index].meals() < self.target {
                index = 0;
            } else {
                index += 1;
            }
        }
        if self.shared.halt(Outcome::AllSatisfied) {
            info!(meal_target = self.target, "every philosopher reached the meal target");
        }
    }
}
