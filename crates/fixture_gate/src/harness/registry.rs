//! CaseRegistry - The fixed, ordered list of cases for a run
//!
//! Every case runs in two variants that share its name:
//! - `Standard` from `<data>/<name>/`
//! - `MemCheck` from `<data>/<name>.memcheck/`

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::fixtures::{FixtureContext, FixtureFiles};
use crate::error::ConfigError;

/// Name of a single case. Position in the registry decides run order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CaseId(String);

impl CaseId {
    /// Create a case id, rejecting names that cannot be a directory name
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        let reason = if name.is_empty() {
            Some("name is empty")
        } else if name.contains(['/', '\\']) {
            Some("name contains a path separator")
        } else if name == "." || name == ".." {
            Some("name is a relative path component")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(ConfigError::InvalidCaseName { name, reason }),
            None => Ok(Self(name)),
        }
    }

    /// The case name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CaseId {
    type Error = ConfigError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

impl From<CaseId> for String {
    fn from(id: CaseId) -> Self {
        id.0
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Execution mode applied to a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Plain optimized build, timed run
    Standard,
    /// Instrumented build run from the `.memcheck` fixture directory
    MemCheck,
}

impl Variant {
    /// Both variants in execution order
    pub const ALL: [Variant; 2] = [Variant::Standard, Variant::MemCheck];

    /// Suffix appended to the case name to form the fixture directory
    pub fn dir_suffix(&self) -> &'static str {
        match self {
            Variant::Standard => "",
            Variant::MemCheck => ".memcheck",
        }
    }

    /// Label used in console lines ("Case one Accepted!")
    pub fn label(&self) -> &'static str {
        match self {
            Variant::Standard => "Case",
            Variant::MemCheck => "Case_memcheck",
        }
    }

    /// Get the string name of the variant
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Standard => "standard",
            Variant::MemCheck => "memcheck",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const MAP_SUITE: [&str; 7] = ["one", "two", "three", "four", "five", "six", "seven"];
const PRIORITY_QUEUE_SUITE: [&str; 5] = ["one", "two", "three", "four", "five"];

/// Ordered, duplicate-free list of cases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRegistry {
    cases: Vec<CaseId>,
}

impl CaseRegistry {
    /// Build a registry from names, in the order given
    pub fn new<I, S>(names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut cases = Vec::new();
        for name in names {
            let id = CaseId::new(name)?;
            if !seen.insert(id.clone()) {
                return Err(ConfigError::DuplicateCase {
                    name: id.to_string(),
                });
            }
            cases.push(id);
        }
        if cases.is_empty() {
            return Err(ConfigError::EmptyRegistry);
        }
        Ok(Self { cases })
    }

    /// Seven-case suite used by the map fixtures
    pub fn map_suite() -> Self {
        Self {
            cases: MAP_SUITE.iter().map(|n| CaseId(n.to_string())).collect(),
        }
    }

    /// Five-case suite used by the priority queue fixtures
    pub fn priority_queue_suite() -> Self {
        Self {
            cases: PRIORITY_QUEUE_SUITE
                .iter()
                .map(|n| CaseId(n.to_string()))
                .collect(),
        }
    }

    /// Cases in execution order
    pub fn cases(&self) -> &[CaseId] {
        &self.cases
    }

    /// Number of cases
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Always false for a constructed registry
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Every fixture context of the run, in execution order
    pub fn fixtures<'a>(
        &'a self,
        data_root: &'a Path,
        files: &'a FixtureFiles,
    ) -> impl Iterator<Item = FixtureContext> + 'a {
        self.cases.iter().flat_map(move |case| {
            Variant::ALL
                .into_iter()
                .map(move |variant| FixtureContext::new(data_root, case, variant, files))
        })
    }
}
