//! Orchestrator - Ordered, fail-fast execution of a case registry
//!
//! For each case, Standard then MemCheck, the orchestrator builds, runs and
//! compares the fixture. A pass cleans up and moves on; the first failure of
//! any kind is reported and halts the run with its files left in place.
//!
//! Every fixture is validated before the first build, so a missing directory
//! or expected-output file aborts the run without producing any case report.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, info_span, warn};

use super::cleanup::cleanup;
use super::comparison::{CompareResult, OutputComparator};
use super::execution::execute;
use super::fixtures::{FixtureContext, FixtureFiles};
use super::logging::Reporter;
use super::registry::{CaseId, CaseRegistry, Variant};
use super::toolchain::Toolchain;
use crate::error::{ConfigError, EXIT_ALL_PASSED, EXIT_CASE_FAILED, GateResult};

/// Result of a single case/variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseStatus {
    /// Output matched the expected answer
    Passed,
    /// Output did not match
    WrongAnswer { detail: String },
    /// The toolchain did not produce an artifact
    BuildFailed {
        reason: String,
        diagnostics: Option<String>,
    },
    /// The artifact could not be started
    LaunchFailed { reason: String },
}

impl CaseStatus {
    pub fn is_pass(&self) -> bool {
        matches!(self, CaseStatus::Passed)
    }

    /// Get the string name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Passed => "passed",
            CaseStatus::WrongAnswer { .. } => "wrong_answer",
            CaseStatus::BuildFailed { .. } => "build_failed",
            CaseStatus::LaunchFailed { .. } => "launch_failed",
        }
    }

    /// One-line explanation for failures
    pub fn detail(&self) -> Option<&str> {
        match self {
            CaseStatus::Passed => None,
            CaseStatus::WrongAnswer { detail } => Some(detail),
            CaseStatus::BuildFailed { reason, .. } | CaseStatus::LaunchFailed { reason } => {
                Some(reason)
            }
        }
    }
}

/// Outcome of one case/variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseOutcome {
    pub case: CaseId,
    pub variant: Variant,
    #[serde(flatten)]
    pub status: CaseStatus,
    /// Run time of the artifact, when it ran
    pub duration: Option<Duration>,
    /// Artifact exit code, when it ran and was not killed by a signal
    pub exit_code: Option<i32>,
}

impl CaseOutcome {
    fn new(ctx: &FixtureContext, status: CaseStatus) -> Self {
        Self {
            case: ctx.case().clone(),
            variant: ctx.variant(),
            status,
            duration: None,
            exit_code: None,
        }
    }

    pub fn passed(&self) -> bool {
        self.status.is_pass()
    }
}

/// Aggregate verdict of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// Every case passed in both variants
    AllPassed,
    /// The run halted at this case/variant
    Failed { case: CaseId, variant: Variant },
}

/// Ordered outcomes plus the final verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub outcomes: Vec<CaseOutcome>,
    #[serde(flatten)]
    pub verdict: Verdict,
    /// Wall-clock time of the whole run
    pub duration: Duration,
}

impl RunReport {
    pub fn all_passed(&self) -> bool {
        self.verdict == Verdict::AllPassed
    }

    /// The outcome that halted the run, if any
    pub fn failure(&self) -> Option<&CaseOutcome> {
        self.outcomes.iter().find(|o| !o.passed())
    }

    /// Process exit code for this report
    pub fn exit_code(&self) -> u8 {
        if self.all_passed() {
            EXIT_ALL_PASSED
        } else {
            EXIT_CASE_FAILED
        }
    }
}

/// Drives a case registry through build, execution and comparison
pub struct Orchestrator<T> {
    registry: CaseRegistry,
    toolchain: T,
    data_root: PathBuf,
    files: FixtureFiles,
    comparator: OutputComparator,
    show_output_on_failure: bool,
}

impl<T: Toolchain> Orchestrator<T> {
    /// Create an orchestrator over fixtures under `data_root`
    pub fn new(registry: CaseRegistry, toolchain: T, data_root: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            toolchain,
            data_root: data_root.into(),
            files: FixtureFiles::default(),
            comparator: OutputComparator::new(),
            show_output_on_failure: false,
        }
    }

    /// Use custom fixture file names
    pub fn with_files(mut self, files: FixtureFiles) -> Self {
        self.files = files;
        self
    }

    /// Use a custom comparator
    pub fn with_comparator(mut self, comparator: OutputComparator) -> Self {
        self.comparator = comparator;
        self
    }

    /// Echo captured output to the reporter when a fixture mismatches
    pub fn show_output_on_failure(mut self, enabled: bool) -> Self {
        self.show_output_on_failure = enabled;
        self
    }

    pub fn registry(&self) -> &CaseRegistry {
        &self.registry
    }

    pub fn toolchain(&self) -> &T {
        &self.toolchain
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// Check the fixture file names, then resolve and validate every fixture
    /// context, in execution order
    ///
    /// Paths are made absolute so child processes, which run inside the
    /// fixture directory, see the same files.
    pub fn preflight(&self) -> Result<Vec<FixtureContext>, ConfigError> {
        self.files.validate()?;
        let root = std::path::absolute(&self.data_root).map_err(|_| {
            ConfigError::MissingFixtureDir {
                path: self.data_root.clone(),
            }
        })?;
        let contexts: Vec<_> = self.registry.fixtures(&root, &self.files).collect();
        for ctx in &contexts {
            ctx.validate()?;
        }
        Ok(contexts)
    }

    /// Run every case in order, stopping at the first failure
    pub fn run(&self, reporter: &mut Reporter) -> GateResult<RunReport> {
        let start = Instant::now();
        let contexts = self.preflight()?;
        info!(
            cases = self.registry.len(),
            data_root = %self.data_root.display(),
            "starting run"
        );

        let mut outcomes = Vec::with_capacity(contexts.len());
        let mut halted_at = None;
        for ctx in &contexts {
            let span = info_span!("fixture", case = %ctx.case(), variant = %ctx.variant());
            let _enter = span.enter();

            let outcome = self.run_fixture(ctx)?;
            reporter.outcome(&outcome);

            if outcome.passed() {
                cleanup(ctx)?;
                outcomes.push(outcome);
                continue;
            }

            warn!(status = outcome.status.as_str(), "halting run");
            if self.show_output_on_failure {
                self.echo_captured(ctx, &outcome, reporter);
            }
            halted_at = Some((ctx.case().clone(), ctx.variant()));
            outcomes.push(outcome);
            break;
        }

        let completed_all = halted_at.is_none();
        let verdict = match halted_at {
            Some((case, variant)) => Verdict::Failed { case, variant },
            None => Verdict::AllPassed,
        };

        let report = RunReport {
            outcomes,
            verdict,
            duration: start.elapsed(),
        };
        reporter.finish(&report);
        info!(
            all_passed = completed_all,
            duration_ms = report.duration.as_secs_f64() * 1000.0,
            "run finished"
        );
        Ok(report)
    }

    /// Build, execute and compare one fixture
    fn run_fixture(&self, ctx: &FixtureContext) -> GateResult<CaseOutcome> {
        let artifact = match self.toolchain.build(ctx) {
            Ok(artifact) => artifact,
            Err(e) => {
                let status = CaseStatus::BuildFailed {
                    reason: e.to_string(),
                    diagnostics: e.stderr().map(str::to_string),
                };
                return Ok(CaseOutcome::new(ctx, status));
            }
        };

        let execution = match execute(ctx, &artifact) {
            Ok(execution) => execution,
            Err(e) => {
                let status = CaseStatus::LaunchFailed {
                    reason: e.to_string(),
                };
                return Ok(CaseOutcome::new(ctx, status));
            }
        };
        info!(
            duration_ms = execution.duration.as_secs_f64() * 1000.0,
            exit_code = ?execution.exit_code,
            "executed"
        );

        let comparison = self
            .comparator
            .compare_files(ctx.captured(), ctx.expected(), ctx.log())?;
        let status = match comparison.result {
            CompareResult::Equal => CaseStatus::Passed,
            CompareResult::Different(diff) => CaseStatus::WrongAnswer {
                detail: diff.describe(),
            },
        };

        Ok(CaseOutcome {
            case: ctx.case().clone(),
            variant: ctx.variant(),
            status,
            duration: Some(execution.duration),
            exit_code: execution.exit_code,
        })
    }

    fn echo_captured(&self, ctx: &FixtureContext, outcome: &CaseOutcome, reporter: &mut Reporter) {
        if !matches!(outcome.status, CaseStatus::WrongAnswer { .. }) {
            return;
        }
        match fs::read(ctx.captured()) {
            Ok(bytes) => reporter.captured_output(outcome, &String::from_utf8_lossy(&bytes)),
            Err(e) => warn!(error = %e, "could not read captured output"),
        }
    }
}
