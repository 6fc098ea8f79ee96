#![allow(clippy::all)]
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]
#![allow(clippy::style)]
//! Fixture Gate
//!
//! An ordered, fail-fast harness that checks solution programs against
//! on-disk fixtures. Each case is built, executed and compared twice, once
//! as a plain timed run and once as an instrumented memory-check run, and the
//! run halts at the first case/variant that fails.
//!
//! ## Architecture
//!
//! The harness provides:
//! - **CaseRegistry**: The fixed, ordered list of cases
//! - **FixtureContext**: Immutable paths for one case/variant
//! - **Toolchain**: Build step behind a trait, with a compiler implementation
//! - **OutputComparator**: Whitespace-insensitive comparison with diffs
//! - **Orchestrator**: The fail-fast state machine producing a `RunReport`
//! - **Reporter**: Human or JSON console output
//!
//! ## Fixture layout
//!
//! ```text
//! <root>/data/<name>/            code.cpp  answer.txt
//! <root>/data/<name>.memcheck/   code.cpp  answer.txt
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fixture_gate::prelude::*;
//!
//! let config = GateConfig::default();
//! let orchestrator = config.orchestrator(Path::new("."))?;
//! let report = orchestrator.run(&mut config.reporter())?;
//! std::process::exit(i32::from(report.exit_code()));
//! ```

#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod harness;

pub use config::GateConfig;
pub use error::{GateError, GateResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::GateConfig;
    pub use crate::error::{
        BuildError, CleanupError, ComparisonError, ConfigError, ExecutionError, GateError,
        GateResult,
    };
    pub use crate::harness::{
        BuildArtifact, CaseId, CaseOutcome, CaseRegistry, CaseStatus, CompareResult,
        CompilerToolchain, FixtureContext, FixtureFiles, Orchestrator, OutputComparator,
        OutputFormat, Reporter, RunReport, Toolchain, ToolchainConfig, Variant, Verdict,
        WhitespaceMode,
    };
}
