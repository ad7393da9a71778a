// Runs a table of dining philosophers and prints the event stream to
// stdout. Diagnostics go to stderr so the stream stays machine-readable.

mod options;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use banquet::{Outcome, Simulation};

use crate::options::Options;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let options = Options::parse();
    init_tracing(options.verbose);

    let config = options.to_config();
    let report = Simulation::run(config)?;

    match report.outcome {
        Outcome::Death { philosopher } => info!(
            philosopher,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "a philosopher died"
        ),
        Outcome::AllSatisfied => info!(
            elapsed_ms = report.elapsed.as_millis() as u64,
            meals = ?report.meals,
            "every philosopher is satisfied"
        ),
        Outcome::Halted => {}
    }
    Ok(())
}
