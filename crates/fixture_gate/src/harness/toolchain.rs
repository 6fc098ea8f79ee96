//! Toolchain - Build step
//!
//! Compiles the fixture source into an executable inside the fixture
//! directory. Only the compiler's exit status decides success; its stderr is
//! kept so a failing build can be reported with diagnostics.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::fixtures::FixtureContext;
use super::registry::Variant;
use crate::error::BuildError;

/// Executable produced by a successful build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifact {
    path: PathBuf,
}

impl BuildArtifact {
    /// Wrap a path that a toolchain just wrote
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Something that can turn a fixture's source into an executable
///
/// The runner is generic over this so tests can drive the state machine
/// without a real compiler.
pub trait Toolchain {
    /// Build the source of `ctx`, honoring its variant
    fn build(&self, ctx: &FixtureContext) -> Result<BuildArtifact, BuildError>;
}

/// Settings for invoking an external compiler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Compiler executable
    pub compiler: String,
    /// Flags passed to every build
    pub flags: Vec<String>,
    /// Extra flags for the MemCheck variant
    pub memcheck_flags: Vec<String>,
    /// Include directories, passed as `-I<dir>`
    pub include_dirs: Vec<PathBuf>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            compiler: "g++".to_string(),
            flags: vec!["-O2".to_string(), "-std=c++11".to_string()],
            memcheck_flags: vec![
                "-fsanitize=address,undefined".to_string(),
                "-fno-omit-frame-pointer".to_string(),
                "-g".to_string(),
            ],
            include_dirs: Vec::new(),
        }
    }
}

/// Toolchain that shells out to a C/C++ style compiler
#[derive(Debug, Clone, Default)]
pub struct CompilerToolchain {
    config: ToolchainConfig,
}

impl CompilerToolchain {
    pub fn new(config: ToolchainConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ToolchainConfig {
        &self.config
    }

    /// Arguments for building `ctx`, in invocation order
    pub fn args(&self, ctx: &FixtureContext) -> Vec<String> {
        let mut args = self.config.flags.clone();
        if ctx.variant() == Variant::MemCheck {
            args.extend(self.config.memcheck_flags.iter().cloned());
        }
        args.push(ctx.source().display().to_string());
        for dir in &self.config.include_dirs {
            args.push(format!("-I{}", dir.display()));
        }
        args.push("-o".to_string());
        args.push(ctx.artifact().display().to_string());
        args
    }
}

impl Toolchain for CompilerToolchain {
    fn build(&self, ctx: &FixtureContext) -> Result<BuildArtifact, BuildError> {
        let args = self.args(ctx);
        debug!(compiler = %self.config.compiler, ?args, dir = %ctx.dir().display(), "building");

        let output = Command::new(&self.config.compiler)
            .args(&args)
            .current_dir(ctx.dir())
            .stdin(Stdio::null())
            .output()
            .map_err(|source| BuildError::Spawn {
                compiler: self.config.compiler.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(BuildError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(BuildArtifact::new(ctx.artifact()))
    }
}
