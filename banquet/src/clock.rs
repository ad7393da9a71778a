//! Monotonic millisecond clock for the whole table.
//!
//! Every timestamp in the simulation (event lines, last-meal records,
//! starvation arithmetic) is a `u64` count of milliseconds since the run
//! started, so no thread ever touches wall-clock time.

use std::thread;
use std::time::{Duration, Instant};

/// Granularity of the slice loop inside [`SimClock::wait`].
const WAIT_SLICE: Duration = Duration::from_millis(1);

/// Monotonic clock anchored at simulation start.
#[derive(Debug, Clone)]
pub struct SimClock {
    origin: Instant,
}

impl SimClock {
    /// Anchor a clock at the current instant.
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Milliseconds elapsed since the clock was anchored.
    pub fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    /// Block the calling thread for approximately `duration`.
    ///
    /// Sleeps in slices of at most one millisecond against a fixed
    /// deadline, so the overshoot is bounded by one slice plus scheduler
    /// latency, a millisecond or two in practice. It never undershoots.
    pub fn wait(&self, duration: Duration) {
        let deadline = Instant::now() + duration;
        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep((deadline - now).min(WAIT_SLICE));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_ms_is_monotonic() {
        let clock = SimClock::start();
        let before = clock.now_ms();
        clock.wait(Duration::from_millis(5));
        let after = clock.now_ms();
        assert!(after >= before + 5);
    }

    #[test]
    fn test_wait_reaches_deadline() {
        let clock = SimClock::start();
        let started = Instant::now();
        clock.wait(Duration::from_millis(50));
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(50));
        // generous ceiling: the slice loop overshoots by a slice at most
        assert!(elapsed < Duration::from_millis(150));
    }

    #[test]
    fn test_zero_wait_returns_immediately() {
        let clock = SimClock::start();
        let started = Instant::now();
        clock.wait(Duration::ZERO);
        assert!(started.elapsed() < Duration::from_millis(20));
    }
}
