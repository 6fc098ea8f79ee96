//! Error taxonomy for the fixture gate.
//!
//! Build and launch failures are reported as case failures by the runner;
//! the variants here only reach the caller when they abort the run outright.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Exit code when every case passed.
pub const EXIT_ALL_PASSED: u8 = 0;
/// Exit code when the run halted on a failing case.
pub const EXIT_CASE_FAILED: u8 = 1;
/// Exit code for command-line usage errors (what clap uses).
pub const EXIT_USAGE: u8 = 2;
/// Exit code for configuration errors (missing fixtures, bad config).
pub const EXIT_CONFIGURATION: u8 = 3;
/// Exit code for IO failures inside the harness itself.
pub const EXIT_INTERNAL: u8 = 4;

/// Fatal configuration problems detected before any case runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A fixture directory for a case/variant does not exist
    #[error("fixture directory not found: {}", path.display())]
    MissingFixtureDir { path: PathBuf },

    /// The expected-output file is missing from a fixture directory
    #[error("expected output not found: {}", path.display())]
    MissingExpected { path: PathBuf },

    /// The same case name appears twice in the registry
    #[error("duplicate case '{name}' in registry")]
    DuplicateCase { name: String },

    /// The registry has no cases
    #[error("case registry is empty")]
    EmptyRegistry,

    /// A case name that cannot be used as a directory name
    #[error("invalid case name {name:?}: {reason}")]
    InvalidCaseName { name: String, reason: &'static str },

    /// A configured fixture file name is unusable
    #[error("invalid file name {name:?} for [files].{field}: {reason}")]
    InvalidFileName {
        field: &'static str,
        name: String,
        reason: &'static str,
    },

    /// The config file could not be read
    #[error("failed to read config {}: {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`crate::GateConfig`]
    #[error("invalid config {}: {source}", path.display())]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// The toolchain could not produce an artifact.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The compiler binary could not be started
    #[error("failed to spawn compiler '{compiler}': {source}")]
    Spawn {
        compiler: String,
        #[source]
        source: std::io::Error,
    },

    /// The compiler ran and reported failure
    #[error("compiler exited with {status}")]
    Failed { status: ExitStatus, stderr: String },
}

impl BuildError {
    /// Compiler diagnostics, if any were captured
    pub fn stderr(&self) -> Option<&str> {
        match self {
            BuildError::Failed { stderr, .. } if !stderr.trim().is_empty() => Some(stderr),
            _ => None,
        }
    }
}

/// The built artifact could not be run.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The artifact is missing or not executable
    #[error("failed to launch {}: {source}", path.display())]
    Launch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The captured-output file could not be created
    #[error("failed to create captured output {}: {source}", path.display())]
    Capture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Comparison could not be carried out. A mismatch is not an error.
#[derive(Debug, Error)]
pub enum ComparisonError {
    /// Either the captured or expected output is unreadable
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The diagnostic log could not be written
    #[error("failed to write comparison log {}: {source}", path.display())]
    WriteLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Generated files could not be removed after a pass.
#[derive(Debug, Error)]
#[error("failed to remove {}: {source}", path.display())]
pub struct CleanupError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Errors that abort a run without a verdict.
#[derive(Debug, Error)]
pub enum GateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Comparison(#[from] ComparisonError),

    #[error(transparent)]
    Cleanup(#[from] CleanupError),
}

impl GateError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            GateError::Config(_) => EXIT_CONFIGURATION,
            GateError::Comparison(_) | GateError::Cleanup(_) => EXIT_INTERNAL,
        }
    }
}

/// Result type for operations that can abort a run
pub type GateResult<T> = Result<T, GateError>;
