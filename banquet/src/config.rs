use std::time::Duration;

use crate::error::ConfigError;

/// Largest philosopher count the table accepts.
pub const MAX_PHILOSOPHERS: usize = 200;

/// Smallest accepted value for each timing parameter.
pub const MIN_TIMING: Duration = Duration::from_millis(60);

// --- Simulation Configuration ---

/// Immutable description of one simulation run.
///
/// All timings are millisecond-granular; the clock does not preserve
/// anything finer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Number of seats at the table (1 to 200).
    pub philosophers: usize,

    /// Longest a philosopher may go without starting a meal (>= 60ms).
    pub time_to_die: Duration,

    /// How long one meal takes (>= 60ms).
    pub time_to_eat: Duration,

    /// How long a philosopher sleeps after a meal (>= 60ms).
    pub time_to_sleep: Duration,

    /// Meals per philosopher after which the run ends in success.
    /// `None` runs unbounded, until a death or an external halt.
    pub meal_target: Option<u32>,
}

impl SimulationConfig {
    /// Build a configuration without a meal target.
    pub fn new(
        philosophers: usize,
        time_to_die: Duration,
        time_to_eat: Duration,
        time_to_sleep: Duration,
    ) -> Self {
        Self {
            philosophers,
            time_to_die,
            time_to_eat,
            time_to_sleep,
            meal_target: None,
        }
    }

    /// Set the meal count after which every philosopher is satisfied.
    pub fn with_meal_target(mut self, target: u32) -> Self {
        self.meal_target = Some(target);
        self
    }

    /// Check every field against the accepted ranges.
    ///
    /// This is the only range gate in the workspace; the CLI hands over
    /// whatever integers it parsed and relies on this check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.philosophers == 0 || self.philosophers > MAX_PHILOSOPHERS {
            return Err(ConfigError::PhilosopherCount {
                got: self.philosophers,
            });
        }
        for (name, value) in [
            ("time_to_die", self.time_to_die),
            ("time_to_eat", self.time_to_eat),
            ("time_to_sleep", self.time_to_sleep),
        ] {
            if value < MIN_TIMING {
                return Err(ConfigError::TimingTooShort {
                    name,
                    got_ms: value.as_millis() as u64,
                });
            }
        }
        if self.meal_target == Some(0) {
            return Err(ConfigError::MealTargetZero);
        }
        Ok(())
    }
}
