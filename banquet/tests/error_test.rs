// Integration tests for error types in banquet::error

use std::io;
use std::time::Duration;

use banquet::{ConfigError, Simulation, SimulationConfig, SimulationError};

#[test]
fn test_config_error_display() {
    assert_eq!(
        ConfigError::PhilosopherCount { got: 0 }.to_string(),
        "philosopher count must be between 1 and 200 (got 0)"
    );
    assert_eq!(
        ConfigError::TimingTooShort {
            name: "time_to_eat",
            got_ms: 12
        }
        .to_string(),
        "time_to_eat must be at least 60ms (got 12ms)"
    );
    assert_eq!(
        ConfigError::MealTargetZero.to_string(),
        "meal target must be at least 1"
    );
}

#[test]
fn test_simulation_error_display() {
    let spawn = SimulationError::ThreadSpawn {
        name: "philosopher-3".to_string(),
        source: io::Error::other("no threads left"),
    };
    assert_eq!(spawn.to_string(), "failed to spawn philosopher-3 thread");

    let panic = SimulationError::ThreadPanic {
        name: "death-monitor".to_string(),
        message: "boom".to_string(),
    };
    assert_eq!(
        panic.to_string(),
        "death-monitor thread panicked: boom"
    );
}

#[test]
fn test_config_error_converts_into_simulation_error() {
    let config = SimulationConfig::new(
        0,
        Duration::from_millis(100),
        Duration::from_millis(100),
        Duration::from_millis(100),
    );
    let err = Simulation::run(config).unwrap_err();
    assert!(matches!(
        err,
        SimulationError::Config(ConfigError::PhilosopherCount { got: 0 })
    ));
}
