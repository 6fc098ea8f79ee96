//! Fixture Harness
//!
//! This module provides the core infrastructure for gated fixture runs:
//!
//! - [`CaseRegistry`]: The fixed, ordered list of cases
//! - [`FixtureContext`]: Immutable per case/variant fixture location
//! - [`Toolchain`]: Build step, with [`CompilerToolchain`] as the real one
//! - [`execute`]: Execution step with captured stdout and timing
//! - [`OutputComparator`]: Whitespace-insensitive comparison
//! - [`cleanup`]: Removal of generated files after a pass
//! - [`Orchestrator`]: Fail-fast driver producing a [`RunReport`]
//! - [`Reporter`]: Console output in human or JSON form

mod cleanup;
mod comparison;
mod execution;
mod fixtures;
mod logging;
mod registry;
mod runner;
mod toolchain;

pub use cleanup::cleanup;
pub use comparison::{CompareResult, ComparisonOutcome, Diff, OutputComparator, WhitespaceMode};
pub use execution::{ExecutionResult, execute};
pub use fixtures::{FixtureContext, FixtureFiles};
pub use logging::{OutputFormat, Reporter};
pub use registry::{CaseId, CaseRegistry, Variant};
pub use runner::{CaseOutcome, CaseStatus, Orchestrator, RunReport, Verdict};
pub use toolchain::{BuildArtifact, CompilerToolchain, Toolchain, ToolchainConfig};
