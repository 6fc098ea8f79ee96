//! Command-line interface for `fixture-gate`.
//!
//! # Examples
//!
//! ```bash
//! # Run the seven-case map suite from the current directory
//! fixture-gate
//!
//! # Run the priority queue suite with JSON output
//! fixture-gate --suite priority-queue --format json
//!
//! # Run two named cases with clang and no sanitizers
//! fixture-gate --case one --case two --compiler clang++ --no-memcheck-instrumentation
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::harness::{OutputFormat, WhitespaceMode};

/// Build, run and diff solution programs against ordered fixtures.
///
/// Exit status: 0 all passed, 1 a case failed, 2 usage error,
/// 3 configuration error, 4 internal IO error.
#[derive(Parser, Debug, Clone)]
#[command(name = "fixture-gate", author, version)]
pub struct Cli {
    /// Project root containing the data directory
    #[arg(long, default_value = ".", env = "FIXTURE_GATE_ROOT")]
    pub root: PathBuf,

    /// Config file (defaults to fixture_gate.toml under the root, if present)
    #[arg(long, env = "FIXTURE_GATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Built-in case list to run
    #[arg(long, value_enum)]
    pub suite: Option<SuiteArg>,

    /// Explicit case names, in order (repeatable; replaces the suite)
    #[arg(long = "case", value_name = "NAME")]
    pub cases: Vec<String>,

    /// Compiler executable
    #[arg(long)]
    pub compiler: Option<String>,

    /// Build the MemCheck variant without sanitizer flags
    #[arg(long)]
    pub no_memcheck_instrumentation: bool,

    /// Whitespace rule used when comparing output
    #[arg(long, value_enum)]
    pub whitespace: Option<WhitespaceArg>,

    /// Console output format
    #[arg(long, short = 'f', value_enum)]
    pub format: Option<FormatArg>,

    /// Disable colored output (also set by any non-falsey NO_COLOR)
    #[arg(
        long,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Print the captured output of a mismatching case
    #[arg(long)]
    pub show_output: bool,

    /// Enable verbose logging (-v info, -vv debug)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Built-in suites.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteArg {
    /// Cases one through seven
    Map,
    /// Cases one through five
    PriorityQueue,
}

/// Whitespace comparison rules.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitespaceArg {
    /// Ignore all whitespace within a line (diff -w)
    IgnoreAll,
    /// Collapse whitespace runs to a single space
    Collapse,
}

impl From<WhitespaceArg> for WhitespaceMode {
    fn from(arg: WhitespaceArg) -> Self {
        match arg {
            WhitespaceArg::IgnoreAll => WhitespaceMode::IgnoreAll,
            WhitespaceArg::Collapse => WhitespaceMode::Collapse,
        }
    }
}

/// Console output formats.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable lines
    Human,
    /// JSON lines
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Human => OutputFormat::Human,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

impl Cli {
    /// Parse command line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create CLI from iterator (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if argument parsing fails.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Tracing filter directive for the verbosity flag
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
