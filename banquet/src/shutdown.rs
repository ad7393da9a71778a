//! Single-fire shutdown latch and the terminal outcomes it records.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::philosopher::PhilosopherState;

/// The shared run flag, flipped true -> false at most once.
///
/// Every thread in the simulation reads this each iteration; whichever
/// monitor (or external caller) first observes a terminal condition wins
/// the swap and owns the shutdown side effects.
#[derive(Debug)]
pub struct StopLatch {
    running: AtomicBool,
}

impl StopLatch {
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(true),
        }
    }

    /// True until shutdown has been requested.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Request shutdown. Returns true for the first caller only; every
    /// later call is a no-op.
    pub fn request(&self) -> bool {
        self.running.swap(false, Ordering::SeqCst)
    }
}

impl Default for StopLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A philosopher went past the death timeout without starting a meal.
    Death { philosopher: usize },
    /// Every philosopher reached the configured meal target.
    AllSatisfied,
    /// The run was stopped from outside before any terminal condition.
    Halted,
}

impl Outcome {
    /// Terminal state the coordinator seals the remaining philosophers
    /// with when this outcome ends the run.
    pub(crate) fn seal_state(self) -> PhilosopherState {
        match self {
            Outcome::AllSatisfied => PhilosopherState::Satisfied,
            Outcome::Death { .. } | Outcome::Halted => PhilosopherState::Dead,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_request_wins() {
        let latch = StopLatch::new();
        assert!(latch.is_running());
        assert!(latch.request());
        assert!(!latch.request());
        assert!(!latch.is_running());
    }

    #[test]
    fn test_concurrent_requests_have_single_winner() {
        use std::sync::Arc;
        use std::thread;

        let latch = Arc::new(StopLatch::new());
        let mut workers = Vec::new();
        for _ in 0..8 {
            let latch = Arc::clone(&latch);
            workers.push(thread::spawn(move || latch.request()));
        }
        let wins = workers
            .into_iter()
            .map(|worker| worker.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(wins, 1);
    }

    #[test]
    fn test_outcome_seal_states() {
        assert_eq!(
            Outcome::AllSatisfied.seal_state(),
            PhilosopherState::Satisfied
        );
        assert_eq!(
            Outcome::Death { philosopher: 3 }.seal_state(),
            PhilosopherState::Dead
        );
        assert_eq!(Outcome::Halted.seal_state(), PhilosopherState::Dead);
    }
}
