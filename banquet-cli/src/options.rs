use std::time::Duration;

use banquet::SimulationConfig;
use clap::Parser;

/// Simulate a table of dining philosophers.
///
/// The run ends when one philosopher starves (its death is the last line
/// printed) or, with a meal target set, when every philosopher has eaten
/// at least that many times.
#[derive(Debug, Parser)]
#[command(name = "banquet", version, about)]
pub struct Options {
    /// Number of philosophers at the table (1 to 200).
    pub philosophers: usize,

    /// Milliseconds without a meal before a philosopher dies (>= 60).
    pub time_to_die: u64,

    /// Milliseconds one meal takes (>= 60).
    pub time_to_eat: u64,

    /// Milliseconds one sleep takes (>= 60).
    pub time_to_sleep: u64,

    /// Stop successfully once every philosopher has eaten this many
    /// times (>= 1).
    pub meal_target: Option<u32>,

    /// Log debug-level diagnostics to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Options {
    /// Map the parsed arguments onto a simulation config. Range checking
    /// happens in [`SimulationConfig::validate`], inside the simulation.
    pub fn to_config(&self) -> SimulationConfig {
        let config = SimulationConfig::new(
            self.philosophers,
            Duration::from_millis(self.time_to_die),
            Duration::from_millis(self.time_to_eat),
            Duration::from_millis(self.time_to_sleep),
        );
        match self.meal_target {
            Some(target) => config.with_meal_target(target),
            None => config,
        }
    }
}
