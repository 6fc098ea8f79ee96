//! FixtureContext - Per case/variant view of the fixture workspace
//!
//! A context is computed once per case and variant and never mutated. Every
//! path the build, execution, comparison and cleanup steps touch comes from
//! it, and child processes receive its directory as their working directory,
//! so the harness never changes the process-wide current directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::registry::{CaseId, Variant};
use crate::error::ConfigError;

/// File names used inside every fixture directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureFiles {
    /// Source file handed to the compiler
    pub source: String,
    /// Known-correct output
    pub expected: String,
    /// Executable written by the compiler
    pub artifact: String,
    /// Captured stdout of the artifact
    pub captured: String,
    /// Comparison diagnostics
    pub log: String,
}

impl Default for FixtureFiles {
    fn default() -> Self {
        Self {
            source: "code.cpp".to_string(),
            expected: "answer.txt".to_string(),
            artifact: "code".to_string(),
            captured: "my.out".to_string(),
            log: "log.out".to_string(),
        }
    }
}

impl FixtureFiles {
    /// Names keyed by their config field, in a fixed order
    pub fn named(&self) -> [(&'static str, &str); 5] {
        [
            ("source", self.source.as_str()),
            ("expected", self.expected.as_str()),
            ("artifact", self.artifact.as_str()),
            ("captured", self.captured.as_str()),
            ("log", self.log.as_str()),
        ]
    }

    /// Check that every name is a plain file name and that no two collide
    ///
    /// A generated file sharing a name with the source or expected output
    /// would overwrite it and then be removed by cleanup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = self.named();
        for (i, &(field, name)) in named.iter().enumerate() {
            let reason = if name.is_empty() {
                Some("name is empty")
            } else if name.contains(['/', '\\']) {
                Some("name contains a path separator")
            } else if name == "." || name == ".." {
                Some("name is a relative path component")
            } else if named[..i].iter().any(|&(_, other)| other == name) {
                Some("name is used by another fixture file")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(ConfigError::InvalidFileName {
                    field,
                    name: name.to_string(),
                    reason,
                });
            }
        }
        Ok(())
    }
}

/// Immutable location of one case/variant fixture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureContext {
    case: CaseId,
    variant: Variant,
    dir: PathBuf,
    source: PathBuf,
    expected: PathBuf,
    artifact: PathBuf,
    captured: PathBuf,
    log: PathBuf,
}

impl FixtureContext {
    /// Resolve the fixture directory and file paths for a case/variant
    pub fn new(data_root: &Path, case: &CaseId, variant: Variant, files: &FixtureFiles) -> Self {
        let dir = data_root.join(format!("{}{}", case, variant.dir_suffix()));
        Self {
            case: case.clone(),
            variant,
            source: dir.join(&files.source),
            expected: dir.join(&files.expected),
            artifact: dir.join(&files.artifact),
            captured: dir.join(&files.captured),
            log: dir.join(&files.log),
            dir,
        }
    }

    pub fn case(&self) -> &CaseId {
        &self.case
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Fixture directory, used as the working directory of child processes
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn expected(&self) -> &Path {
        &self.expected
    }

    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    pub fn captured(&self) -> &Path {
        &self.captured
    }

    pub fn log(&self) -> &Path {
        &self.log
    }

    /// Files generated by a run of this context, removed by cleanup
    pub fn generated(&self) -> [&Path; 3] {
        [&self.artifact, &self.captured, &self.log]
    }

    /// Check that the directory and expected output exist
    ///
    /// The source file is not checked here: a missing source is a build
    /// failure reported against the case, not a configuration problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.dir.is_dir() {
            return Err(ConfigError::MissingFixtureDir {
                path: self.dir.clone(),
            });
        }
        if !self.expected.is_file() {
            return Err(ConfigError::MissingExpected {
                path: self.expected.clone(),
            });
        }
        Ok(())
    }
}
