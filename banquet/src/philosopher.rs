//! # Philosopher Record
//!
//! Per-seat state shared between the philosopher's own thread and the
//! monitors.
//!
//! ## Key Concepts
//! - State cell: the lifecycle state is an atomic tagged enum; the
//!   terminal states (Dead, Satisfied) are write-once and every later
//!   writer backs off
//! - Meal bookkeeping: the meal counter and the last-meal timestamp are
//!   single atomic words, so a monitor can never observe a torn value
//! - Fork handles: each seat owns handles to the two ring forks it may use
//!
//! ## Thread Safety
//! Everything here is lock-free. Cross-thread fields use `SeqCst`
//! throughout; this table is far too small for the ordering to matter to
//! performance and the strongest ordering keeps the starvation check easy
//! to reason about.

use std::sync::atomic::{AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use crate::table::Fork;

/// Lifecycle states a philosopher moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhilosopherState {
    /// Created, thread not yet in its loop.
    Idle,
    Thinking,
    /// Between deciding to eat and holding both forks.
    AcquiringForks,
    Eating,
    Sleeping,
    /// Terminal: starved past the death timeout, or sealed at shutdown.
    Dead,
    /// Terminal: the whole table reached the meal target.
    Satisfied,
}

impl PhilosopherState {
    /// Dead and Satisfied are never overwritten once stored.
    pub fn is_terminal(self) -> bool {
        matches!(self, PhilosopherState::Dead | PhilosopherState::Satisfied)
    }

    fn as_u8(self) -> u8 {
        match self {
            PhilosopherState::Idle => 0,
            PhilosopherState::Thinking => 1,
            PhilosopherState::AcquiringForks => 2,
            PhilosopherState::Eating => 3,
            PhilosopherState::Sleeping => 4,
            PhilosopherState::Dead => 5,
            PhilosopherState::Satisfied => 6,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => PhilosopherState::Idle,
            1 => PhilosopherState::Thinking,
            2 => PhilosopherState::AcquiringForks,
            3 => PhilosopherState::Eating,
            4 => PhilosopherState::Sleeping,
            5 => PhilosopherState::Dead,
            _ => PhilosopherState::Satisfied,
        }
    }
}

/// Atomic cell holding a [`PhilosopherState`].
///
/// All writes go through compare-and-set loops that refuse to replace a
/// terminal value. That gives the Dead transition its single-reporter
/// guarantee: exactly one caller of [`StateCell::seal`] sees `true`.
#[derive(Debug)]
struct StateCell {
    raw: AtomicU8,
}

impl StateCell {
    fn new(state: PhilosopherState) -> Self {
        Self {
            raw: AtomicU8::new(state.as_u8()),
        }
    }

    fn load(&self) -> PhilosopherState {
        PhilosopherState::from_u8(self.raw.load(Ordering::SeqCst))
    }

    /// Store a non-terminal state unless the cell already went terminal.
    fn store_if_active(&self, state: PhilosopherState) {
        let mut current = self.raw.load(Ordering::SeqCst);
        loop {
            if PhilosopherState::from_u8(current).is_terminal() {
                return;
            }
            match self.raw.compare_exchange(
                current,
                state.as_u8(),
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }

    /// Transition to a terminal state. Returns true only for the caller
    /// whose compare-and-set performed the transition.
    fn seal(&self, terminal: PhilosopherState) -> bool {
        debug_assert!(terminal.is_terminal());
        let mut current = self.raw.load(Ordering::SeqCst);
        loop {
            if PhilosopherState::from_u8(current).is_terminal() {
                return false;
            }
            match self.raw.compare_exchange(
                current,
                terminal.as_u8(),
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
    }
}

/// One seat at the table.
#[derive(Debug)]
pub struct Philosopher {
    id: usize,
    state: StateCell,
    meals: AtomicU32,
    last_meal_ms: AtomicU64,
    left: Arc<Fork>,
    right: Arc<Fork>,
}

impl Philosopher {
    pub(crate) fn new(id: usize, left: Arc<Fork>, right: Arc<Fork>) -> Self {
        Self {
            id,
            state: StateCell::new(PhilosopherState::Idle),
            meals: AtomicU32::new(0),
            last_meal_ms: AtomicU64::new(0),
            left,
            right,
        }
    }

    /// 1-based seat number; its parity decides the fork order.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn state(&self) -> PhilosopherState {
        self.state.load()
    }

    /// Completed meals so far.
    pub fn meals(&self) -> u32 {
        self.meals.load(Ordering::SeqCst)
    }

    /// Milliseconds since this philosopher last started a meal.
    pub fn ms_since_meal(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_meal_ms.load(Ordering::SeqCst))
    }

    pub(crate) fn set_state(&self, state: PhilosopherState) {
        self.state.store_if_active(state);
    }

    /// Declare this philosopher dead. True only for the single caller
    /// whose transition landed; false whenever a terminal state was
    /// already present.
    pub(crate) fn mark_dead(&self) -> bool {
        self.state.seal(PhilosopherState::Dead)
    }

    pub(crate) fn seal(&self, terminal: PhilosopherState) {
        self.state.seal(terminal);
    }

    pub(crate) fn record_meal_start(&self, now_ms: u64) {
        self.last_meal_ms.store(now_ms, Ordering::SeqCst);
    }

    pub(crate) fn finish_meal(&self) {
        self.meals.fetch_add(1, Ordering::SeqCst);
    }

    /// Forks in acquisition order: even seats right-then-left, odd seats
    /// left-then-right. The parity split keeps the ring free of circular
    /// waits.
    pub(crate) fn forks_in_order(&self) -> (&Arc<Fork>, &Arc<Fork>) {
        if self.id % 2 == 0 {
            (&self.right, &self.left)
        } else {
            (&self.left, &self.right)
        }
    }

    pub(crate) fn left_fork(&self) -> &Arc<Fork> {
        &self.left
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;

    fn seat() -> Philosopher {
        let table = Table::new(2);
        let (left, right) = table.seat_pair(0);
        Philosopher::new(1, left, right)
    }

    #[test]
    fn test_dead_is_write_once() {
        let philosopher = seat();
        assert!(philosopher.mark_dead());
        assert!(!philosopher.mark_dead());
        philosopher.set_state(PhilosopherState::Thinking);
        assert_eq!(philosopher.state(), PhilosopherState::Dead);
    }

    #[test]
    fn test_satisfied_is_terminal() {
        let philosopher = seat();
        philosopher.seal(PhilosopherState::Satisfied);
        assert!(!philosopher.mark_dead());
        assert_eq!(philosopher.state(), PhilosopherState::Satisfied);
    }

    #[test]
    fn test_parity_fork_order() {
        let table = Table::new(4);

        let (left, right) = table.seat_pair(0);
        let odd = Philosopher::new(1, Arc::clone(&left), right);
        let (first, second) = odd.forks_in_order();
        assert_eq!(first.id(), left.id());
        assert_ne!(second.id(), left.id());

        let (left, right) = table.seat_pair(1);
        let even = Philosopher::new(2, left, Arc::clone(&right));
        let (first, _) = even.forks_in_order();
        assert_eq!(first.id(), right.id());
    }

    #[test]
    fn test_meal_bookkeeping() {
        let philosopher = seat();
        assert_eq!(philosopher.meals(), 0);
        philosopher.record_meal_start(120);
        philosopher.finish_meal();
        assert_eq!(philosopher.meals(), 1);
        assert_eq!(philosopher.ms_since_meal(150), 30);
        // an older "now" saturates to zero rather than wrapping
        assert_eq!(philosopher.ms_since_meal(100), 0);
    }

    #[test]
    fn test_concurrent_death_has_single_winner() {
        use std::thread;

        let philosopher = Arc::new(seat());
        let mut workers = Vec::new();
        for _ in 0..8 {
            let philosopher = Arc::clone(&philosopher);
            workers.push(thread::spawn(move || philosopher.mark_dead()));
        }
        let wins = workers
            .into_iter()
            .map(|worker| worker.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(wins, 1);
    }
}
