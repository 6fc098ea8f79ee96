//! Runtime configuration for `fixture-gate`.
//!
//! [`GateConfig`] is the single source of truth for a run, independent of
//! whether a setting came from defaults, a TOML file or the command line.
//!
//! ```toml
//! [suite]
//! preset = "priority-queue"
//! data_dir = "data"
//!
//! [toolchain]
//! compiler = "clang++"
//! flags = ["-O2", "-std=c++17"]
//! memcheck_flags = []
//!
//! [compare]
//! whitespace = "collapse"
//!
//! [report]
//! format = "json"
//! ```

use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::{Cli, SuiteArg};
use crate::error::ConfigError;
use crate::harness::{
    CaseRegistry, CompilerToolchain, FixtureFiles, Orchestrator, OutputComparator, OutputFormat,
    Reporter, ToolchainConfig, WhitespaceMode,
};

/// Config file looked up under the project root when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "fixture_gate.toml";

/// Built-in case lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuitePreset {
    /// Cases one through seven
    #[default]
    Map,
    /// Cases one through five
    PriorityQueue,
}

impl From<SuiteArg> for SuitePreset {
    fn from(arg: SuiteArg) -> Self {
        match arg {
            SuiteArg::Map => SuitePreset::Map,
            SuiteArg::PriorityQueue => SuitePreset::PriorityQueue,
        }
    }
}

/// Which cases run, and where their fixtures live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Preset used when `cases` is not set
    pub preset: SuitePreset,
    /// Explicit ordered case list
    pub cases: Option<Vec<String>>,
    /// Fixture directory, relative to the project root
    pub data_dir: PathBuf,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            preset: SuitePreset::Map,
            cases: None,
            data_dir: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    pub whitespace: WhitespaceMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub format: OutputFormat,
    pub color: bool,
    /// Echo the captured output of a mismatching case
    pub show_output_on_failure: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: true,
            show_output_on_failure: false,
        }
    }
}

/// Complete configuration of a run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    pub suite: SuiteConfig,
    pub toolchain: ToolchainConfig,
    pub files: FixtureFiles,
    pub compare: CompareConfig,
    pub report: ReportConfig,
}

impl GateConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Resolve the config for a CLI invocation: file first, then flags
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => {
                let default = cli.root.join(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::load(&default)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_cli(cli);
        Ok(config)
    }

    /// Override settings with explicitly given flags
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(suite) = cli.suite {
            self.suite.preset = suite.into();
            self.suite.cases = None;
        }
        if !cli.cases.is_empty() {
            self.suite.cases = Some(cli.cases.clone());
        }
        if let Some(compiler) = &cli.compiler {
            self.toolchain.compiler = compiler.clone();
        }
        if cli.no_memcheck_instrumentation {
            self.toolchain.memcheck_flags.clear();
        }
        if let Some(whitespace) = cli.whitespace {
            self.compare.whitespace = whitespace.into();
        }
        if let Some(format) = cli.format {
            self.report.format = format.into();
        }
        if cli.no_color {
            self.report.color = false;
        }
        if cli.show_output {
            self.report.show_output_on_failure = true;
        }
    }

    /// The ordered case list for this run
    pub fn registry(&self) -> Result<CaseRegistry, ConfigError> {
        match &self.suite.cases {
            Some(cases) => CaseRegistry::new(cases.iter().cloned()),
            None => Ok(match self.suite.preset {
                SuitePreset::Map => CaseRegistry::map_suite(),
                SuitePreset::PriorityQueue => CaseRegistry::priority_queue_suite(),
            }),
        }
    }

    /// Toolchain settings with include dirs resolved against `root`
    ///
    /// With no include dirs configured, the project root itself is used,
    /// so fixture sources can include headers that sit next to `data/`.
    pub fn toolchain_for(&self, root: &Path) -> ToolchainConfig {
        let mut toolchain = self.toolchain.clone();
        if toolchain.include_dirs.is_empty() {
            toolchain.include_dirs.push(root.to_path_buf());
        } else {
            toolchain.include_dirs = toolchain
                .include_dirs
                .iter()
                .map(|dir| root.join(dir))
                .collect();
        }
        toolchain
    }

    /// Build the orchestrator for fixtures under `root`
    pub fn orchestrator(
        &self,
        root: &Path,
    ) -> Result<Orchestrator<CompilerToolchain>, ConfigError> {
        let root = std::path::absolute(root).map_err(|_| ConfigError::MissingFixtureDir {
            path: root.to_path_buf(),
        })?;
        let toolchain = CompilerToolchain::new(self.toolchain_for(&root));
        Ok(
            Orchestrator::new(self.registry()?, toolchain, root.join(&self.suite.data_dir))
                .with_files(self.files.clone())
                .with_comparator(OutputComparator::with_mode(self.compare.whitespace))
                .show_output_on_failure(self.report.show_output_on_failure),
        )
    }

    /// Console reporter for this config
    ///
    /// Colors are only used when stdout is a terminal.
    pub fn reporter(&self) -> Reporter {
        let colors = self.report.color && io::stdout().is_terminal();
        Reporter::new()
            .with_format(self.report.format)
            .with_colors(colors)
    }
}
