//! Execution step
//!
//! Runs a built artifact with no arguments and no stdin, redirecting stdout
//! verbatim into the captured-output file. The artifact's exit status is
//! recorded but never decides pass/fail; comparison does.

use std::fs::File;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::fixtures::FixtureContext;
use super::toolchain::BuildArtifact;
use crate::error::ExecutionError;

/// Outcome of running an artifact to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// File holding the captured stdout
    pub captured: PathBuf,
    /// Exit code, `None` when terminated by a signal
    pub exit_code: Option<i32>,
    /// Wall-clock run time
    pub duration: Duration,
}

impl ExecutionResult {
    /// Whether the artifact exited with status zero
    pub fn exited_cleanly(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Run `artifact` inside the fixture directory of `ctx`
pub fn execute(
    ctx: &FixtureContext,
    artifact: &BuildArtifact,
) -> Result<ExecutionResult, ExecutionError> {
    let stdout = File::create(ctx.captured()).map_err(|source| ExecutionError::Capture {
        path: ctx.captured().to_path_buf(),
        source,
    })?;

    debug!(artifact = %artifact.path().display(), "executing");
    let start = Instant::now();
    let status = Command::new(artifact.path())
        .current_dir(ctx.dir())
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::inherit())
        .status()
        .map_err(|source| ExecutionError::Launch {
            path: artifact.path().to_path_buf(),
            source,
        })?;
    let duration = start.elapsed();

    let result = ExecutionResult {
        captured: ctx.captured().to_path_buf(),
        exit_code: status.code(),
        duration,
    };
    if !result.exited_cleanly() {
        warn!(
            case = %ctx.case(),
            variant = %ctx.variant(),
            exit_code = ?result.exit_code,
            "artifact exited abnormally"
        );
    }
    debug!(duration_ms = duration.as_secs_f64() * 1000.0, "execution finished");
    Ok(result)
}
