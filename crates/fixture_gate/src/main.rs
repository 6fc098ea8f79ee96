#![forbid(unsafe_code)]

//! # fixture-gate
//!
//! Builds, runs and diffs every case of a fixture suite in order, stopping
//! at the first failure.
//!
//! ## Usage
//!
//! ```bash
//! fixture-gate                          # map suite under ./data
//! fixture-gate --suite priority-queue   # five-case suite
//! fixture-gate --root path/to/project -v
//! ```

use std::process::ExitCode;

use fixture_gate::cli::Cli;
use fixture_gate::harness::RunReport;
use fixture_gate::{GateConfig, GateResult};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(report) => ExitCode::from(report.exit_code()),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: &Cli) -> GateResult<RunReport> {
    let config = GateConfig::from_cli(cli)?;
    let orchestrator = config.orchestrator(&cli.root)?;
    let mut reporter = config.reporter();
    orchestrator.run(&mut reporter)
}
