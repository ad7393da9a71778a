//! # Philosopher Lifecycle
//!
//! The think, acquire, eat, sleep loop that each philosopher thread runs
//! until it is told to stop.
//!
//! ## Key Concepts
//!
//! - **Transactional acquisition**: forks are taken in parity order and
//!   held as RAII guards. If the second fork is refused because shutdown
//!   arrived in between, dropping the first guard rolls the acquisition
//!   back and the seat never eats with one fork.
//! - **Parity stagger**: even seats delay their first acquisition by
//!   almost one eat duration, so neighbours do not storm the same fork
//!   at boot.
//! - **Solo seat**: a table of one holds its single fork until the death
//!   monitor ends the run. It can never eat.

use std::time::Duration;

use tracing::debug;

use crate::event::TableEvent;
use crate::philosopher::{Philosopher, PhilosopherState};
use crate::runtime::Shared;
use crate::table::{Fork, ForkGuard};

/// Head start left to odd seats before the even seats join the scramble.
const STAGGER_MARGIN: Duration = Duration::from_millis(10);

/// Poll interval of the lone philosopher waiting for its declared death.
const SOLO_POLL: Duration = Duration::from_millis(1);

/// One philosopher's view of the table, driven on its own thread.
pub(crate) struct Seat<'a> {
    shared: &'a Shared,
    philosopher: &'a Philosopher,
}

impl<'a> Seat<'a> {
    pub(crate) fn new(shared: &'a Shared, index: usize) -> Self {
        Self {
            shared,
            philosopher: &shared.philosophers[index],
        }
    }

    /// Run the lifecycle loop until death, satiety or an external halt.
    pub(crate) fn run(&self) {
        self.philosopher
            .record_meal_start(self.shared.clock.now_ms());
        if self.philosopher.id() % 2 == 0 {
            let head_start = self
                .shared
                .config
                .time_to_eat
                .saturating_sub(STAGGER_MARGIN);
            self.shared.clock.wait(head_start);
        }

        if self.shared.philosophers.len() == 1 {
            self.dine_alone();
            return;
        }

        while self.active() {
            if !self.think() {
                break;
            }
            let Some(forks) = self.acquire_forks() else {
                break;
            };
            self.dine(forks);
            if self.philosopher.state().is_terminal() {
                break;
            }
            if !self.rest() {
                break;
            }
        }
        debug!(id = self.philosopher.id(), "philosopher loop finished");
    }

    /// Whether the seat should keep going: the table is running and this
    /// philosopher has not been sealed.
    fn active(&self) -> bool {
        self.shared.latch.is_running() && !self.philosopher.state().is_terminal()
    }

    fn think(&self) -> bool {
        self.philosopher.set_state(PhilosopherState::Thinking);
        if !self.active() {
            return false;
        }
        self.shared
            .events
            .emit(self.philosopher.id(), TableEvent::Thinking);
        true
    }

    /// Take both forks in parity order, or neither.
    ///
    /// The running state is re-checked before each fork. A `None` from the
    /// second [`Seat::take`] drops the first guard on the way out, which
    /// is the rollback.
    fn acquire_forks(&self) -> Option<(ForkGuard<'a>, ForkGuard<'a>)> {
        self.philosopher.set_state(PhilosopherState::AcquiringForks);
        let (first, second) = self.philosopher.forks_in_order();
        let first_guard = self.take(first)?;
        let second_guard = self.take(second)?;
        Some((first_guard, second_guard))
    }

    fn take(&self, fork: &'a Fork) -> Option<ForkGuard<'a>> {
        if !self.active() {
            return None;
        }
        let guard = fork.pick_up();
        self.shared
            .events
            .emit(self.philosopher.id(), TableEvent::ForkTaken);
        Some(guard)
    }

    /// Eat for the configured duration, then release both forks.
    ///
    /// A seat that was sealed while blocked on a fork returns here
    /// without eating; the early return drops both guards. The meal
    /// counter moves only after the full eat duration, so the satiety
    /// monitor never credits an interrupted meal.
    fn dine(&self, forks: (ForkGuard<'a>, ForkGuard<'a>)) {
        self.philosopher.set_state(PhilosopherState::Eating);
        if !self.active() {
            return;
        }
        self.shared
            .events
            .emit(self.philosopher.id(), TableEvent::Eating);
        self.philosopher
            .record_meal_start(self.shared.clock.now_ms());
        self.shared.clock.wait(self.shared.config.time_to_eat);
        self.philosopher.finish_meal();
        drop(forks);
    }

    /// Sleep for the configured duration. Termination during the sleep is
    /// noticed afterwards, on the next loop check.
    fn rest(&self) -> bool {
        self.philosopher.set_state(PhilosopherState::Sleeping);
        if !self.active() {
            return false;
        }
        self.shared
            .events
            .emit(self.philosopher.id(), TableEvent::Sleeping);
        self.shared.clock.wait(self.shared.config.time_to_sleep);
        true
    }

    /// The one-seat table: hold the only fork until the death monitor
    /// declares the starvation, then put it down.
    fn dine_alone(&self) {
        self.philosopher.set_state(PhilosopherState::AcquiringForks);
        let Some(guard) = self.take(self.philosopher.left_fork()) else {
            return;
        };
        self.shared.clock.wait(self.shared.config.time_to_die);
        while self.active() {
            self.shared.clock.wait(SOLO_POLL);
        }
        drop(guard);
    }
}
