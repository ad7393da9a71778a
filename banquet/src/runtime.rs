//! # Simulation Runtime
//!
//! Owns the shared state and spawns one thread per seat plus the
//! monitors, then turns the joined threads into a [`Report`].
//!
//! ## Key Concepts
//!
//! - **Single shared core**: every thread holds one `Arc<Shared>`. The
//!   shared core carries the config, the clock, the latch, the event log
//!   and the philosopher records.
//! - **First halt wins**: [`Shared::halt`] flips the latch at most once.
//!   The winning call records the outcome and seals every philosopher
//!   into its terminal state; later calls are no-ops.
//! - **Join discipline**: [`SimulationHandle::wait`] joins every thread
//!   before reporting, so no simulation thread outlives the run. The
//!   first panic observed is surfaced as the run's error.

use std::any::Any;
use std::io::Write;
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::anyhow;
use tracing::{debug, error, info};

use crate::clock::SimClock;
use crate::config::SimulationConfig;
use crate::error::{ConfigError, SimulationError};
use crate::event::EventLog;
use crate::lifecycle::Seat;
use crate::monitor::{DeathMonitor, SatietyMonitor};
use crate::philosopher::Philosopher;
use crate::shutdown::{Outcome, StopLatch};
use crate::table::Table;

/// State shared by every simulation thread.
pub(crate) struct Shared {
    pub(crate) config: SimulationConfig,
    pub(crate) clock: Arc<SimClock>,
    pub(crate) latch: Arc<StopLatch>,
    pub(crate) events: EventLog,
    pub(crate) philosophers: Vec<Philosopher>,
    outcome: OnceLock<Outcome>,
}

impl Shared {
    fn new(config: SimulationConfig, sink: Option<Box<dyn Write + Send>>) -> Self {
        let clock = Arc::new(SimClock::start());
        let latch = Arc::new(StopLatch::new());
        let events = match sink {
            Some(sink) => EventLog::new(Arc::clone(&clock), Arc::clone(&latch), sink),
            None => EventLog::stdout(Arc::clone(&clock), Arc::clone(&latch)),
        };
        let table = Table::new(config.philosophers);
        let philosophers = (0..config.philosophers)
            .map(|index| {
                let (left, right) = table.seat_pair(index);
                Philosopher::new(index + 1, left, right)
            })
            .collect();
        Self {
            config,
            clock,
            latch,
            events,
            philosophers,
            outcome: OnceLock::new(),
        }
    }

    /// The shutdown coordinator: flip the latch, then record the outcome
    /// and seal every philosopher. Only the first caller does any of it;
    /// the return value says whether this call was the one. Seals emit no
    /// events.
    pub(crate) fn halt(&self, outcome: Outcome) -> bool {
        if !self.latch.request() {
            return false;
        }
        let _ = self.outcome.set(outcome);
        for philosopher in &self.philosophers {
            philosopher.seal(outcome.seal_state());
        }
        debug!(?outcome, "shutdown latched");
        true
    }

    fn outcome(&self) -> Option<Outcome> {
        self.outcome.get().copied()
    }
}

struct NamedThread {
    name: String,
    handle: JoinHandle<()>,
}

/// Spawn a named thread, or halt the table and fail if the OS refuses.
fn spawn_thread<F>(
    shared: &Arc<Shared>,
    threads: &mut Vec<NamedThread>,
    name: String,
    body: F,
) -> Result<(), SimulationError>
where
    F: FnOnce() + Send + 'static,
{
    match thread::Builder::new().name(name.clone()).spawn(body) {
        Ok(handle) => {
            threads.push(NamedThread { name, handle });
            Ok(())
        }
        Err(source) => {
            shared.halt(Outcome::Halted);
            Err(SimulationError::ThreadSpawn { name, source })
        }
    }
}

/// A validated, not yet started run.
pub struct Simulation {
    shared: Arc<Shared>,
}

impl Simulation {
    /// Validate the config and set the table, streaming events to stdout.
    ///
    /// The simulation clock starts here, so event timestamps count from
    /// construction rather than from [`Simulation::start`].
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            shared: Arc::new(Shared::new(config, None)),
        })
    }

    /// Like [`Simulation::new`], but streaming events into `sink`.
    pub fn with_event_sink(
        config: SimulationConfig,
        sink: Box<dyn Write + Send>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            shared: Arc::new(Shared::new(config, Some(sink))),
        })
    }

    /// Spawn every philosopher thread, the death monitor and, when a
    /// meal target is set, the satiety monitor.
    pub fn start(self) -> Result<SimulationHandle, SimulationError> {
        let shared = self.shared;
        let seats = shared.philosophers.len();
        info!(
            philosophers = seats,
            meal_target = ?shared.config.meal_target,
            "starting simulation"
        );

        let mut threads = Vec::with_capacity(seats + 2);
        for index in 0..seats {
            let worker = Arc::clone(&shared);
            spawn_thread(
                &shared,
                &mut threads,
                format!("philosopher-{}", index + 1),
                move || Seat::new(&worker, index).run(),
            )?;
        }

        let monitor = DeathMonitor::new(Arc::clone(&shared));
        spawn_thread(&shared, &mut threads, "death-monitor".into(), move || {
            monitor.run()
        })?;

        if let Some(target) = shared.config.meal_target {
            let monitor = SatietyMonitor::new(Arc::clone(&shared), target);
            spawn_thread(&shared, &mut threads, "satiety-monitor".into(), move || {
                monitor.run()
            })?;
        }

        debug!(threads = threads.len(), "simulation threads spawned");
        Ok(SimulationHandle { shared, threads })
    }

    /// Run a simulation to completion: validate, start, wait.
    ///
    /// This is the blocking entry point the command line uses.
    pub fn run(config: SimulationConfig) -> Result<Report, SimulationError> {
        Simulation::new(config)?.start()?.wait()
    }
}

/// A running simulation.
///
/// Dropping the handle without calling [`SimulationHandle::wait`]
/// detaches the threads; they keep running until an outcome halts them.
pub struct SimulationHandle {
    shared: Arc<Shared>,
    threads: Vec<NamedThread>,
}

impl SimulationHandle {
    /// Request an external stop. Idempotent, and a no-op when a death or
    /// a satisfied table already ended the run.
    pub fn halt(&self) {
        if self.shared.halt(Outcome::Halted) {
            info!("simulation halted on request");
        }
    }

    /// Join every simulation thread and report how the run ended.
    pub fn wait(self) -> Result<Report, SimulationError> {
        let mut failure = None;
        for NamedThread { name, handle } in self.threads {
            match handle.join() {
                Ok(()) => debug!(thread = %name, "joined"),
                Err(payload) => {
                    let message = panic_message(payload);
                    error!(thread = %name, message = %message, "thread panicked");
                    if failure.is_none() {
                        failure = Some(SimulationError::ThreadPanic { name, message });
                    }
                }
            }
        }
        if let Some(error) = failure {
            return Err(error);
        }

        let outcome = self
            .shared
            .outcome()
            .ok_or_else(|| anyhow!("simulation ended without a recorded outcome"))?;
        let meals = self
            .shared
            .philosophers
            .iter()
            .map(Philosopher::meals)
            .collect();
        let elapsed = Duration::from_millis(self.shared.clock.now_ms());
        info!(?outcome, ?elapsed, "simulation finished");
        Ok(Report {
            outcome,
            meals,
            elapsed,
        })
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "unknown panic".to_string()
    }
}

/// How a finished run went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub outcome: Outcome,
    /// Completed meals per seat; index `i` belongs to philosopher `i + 1`.
    pub meals: Vec<u32>,
    pub elapsed: Duration,
}
