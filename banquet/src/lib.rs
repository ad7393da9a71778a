// Banquet: a dining-philosophers table simulator.
//
// This crate runs one OS thread per philosopher plus the table monitors.
// It streams timestamped events while the dinner lasts and reports how
// the run ended (a starvation, a satisfied table, or an external halt).

pub mod clock;
pub mod config;
pub mod error;
pub mod event;
mod lifecycle;
mod monitor;
pub mod philosopher;
pub mod runtime;
pub mod shutdown;
pub mod table;

// Re-export the types a typical caller needs
pub use clock::SimClock;
pub use config::{SimulationConfig, MAX_PHILOSOPHERS, MIN_TIMING};
pub use error::{ConfigError, SimulationError};
pub use event::{EventLog, TableEvent};
pub use philosopher::{Philosopher, PhilosopherState};
pub use runtime::{Report, Simulation, SimulationHandle};
pub use shutdown::{Outcome, StopLatch};
pub use table::{Fork, Table};
