//! OutputComparator - Whitespace-insensitive comparison of captured output
//!
//! Provides:
//! - `diff -w` style comparison (all whitespace inside a line ignored)
//! - Collapsed-whitespace comparison (runs of whitespace become one space)
//! - First differing line and unified diff for mismatches
//! - A diagnostic log file written next to the captured output
//!
//! Under both modes CRLF and LF line endings are equivalent and trailing
//! empty lines at the end of either text are ignored.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use similar::TextDiff;

use crate::error::ComparisonError;

/// How whitespace differences are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WhitespaceMode {
    /// Remove every whitespace character from each line before comparing
    #[default]
    IgnoreAll,
    /// Collapse whitespace runs to one space and trim each line
    Collapse,
}

/// Detailed mismatch information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff {
    /// Line number of first difference (1-indexed)
    pub first_diff_line: usize,
    /// Expected line at that position, if the expected text has one
    pub expected_line: Option<String>,
    /// Actual line at that position, if the captured text has one
    pub actual_line: Option<String>,
    /// Unified diff of the raw texts
    pub unified_diff: String,
}

impl Diff {
    /// Get a human-readable description of the difference
    pub fn describe(&self) -> String {
        match (&self.expected_line, &self.actual_line) {
            (Some(e), Some(a)) => format!(
                "line {}: expected {:?}, got {:?}",
                self.first_diff_line, e, a
            ),
            (Some(e), None) => format!(
                "line {}: expected {:?}, but output ended",
                self.first_diff_line, e
            ),
            (None, Some(a)) => format!(
                "line {}: expected end of output, got {:?}",
                self.first_diff_line, a
            ),
            (None, None) => format!("line {}: difference detected", self.first_diff_line),
        }
    }
}

/// Result of comparing two texts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareResult {
    /// Texts are equivalent under the whitespace rule
    Equal,
    /// Texts differ, with detailed diff
    Different(Diff),
}

impl CompareResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, CompareResult::Equal)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, CompareResult::Different(_))
    }

    /// Get the diff if this is a Different result
    pub fn diff(&self) -> Option<&Diff> {
        match self {
            CompareResult::Different(diff) => Some(diff),
            CompareResult::Equal => None,
        }
    }
}

/// Outcome of comparing a captured-output file with its expected output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonOutcome {
    /// Comparison verdict
    pub result: CompareResult,
    /// Diagnostic log written for this comparison
    pub log: PathBuf,
}

impl ComparisonOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_pass()
    }
}

/// Comparator for captured program output
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputComparator {
    mode: WhitespaceMode,
}

impl OutputComparator {
    /// Create a comparator with `diff -w` semantics
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: WhitespaceMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> WhitespaceMode {
        self.mode
    }

    fn normalize_line(&self, line: &str) -> String {
        match self.mode {
            WhitespaceMode::IgnoreAll => line.chars().filter(|c| !c.is_whitespace()).collect(),
            WhitespaceMode::Collapse => line.split_whitespace().collect::<Vec<_>>().join(" "),
        }
    }

    /// Normalize a text into comparable lines
    fn normalize(&self, text: &str) -> Vec<String> {
        let mut lines: Vec<String> = text.lines().map(|l| self.normalize_line(l)).collect();
        while lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
        lines
    }

    /// Generate unified diff format
    fn generate_unified_diff(expected: &str, actual: &str) -> String {
        let diff = TextDiff::from_lines(expected, actual);
        let mut result = String::new();

        result.push_str("--- expected\n");
        result.push_str("+++ actual\n");

        for hunk in diff.unified_diff().iter_hunks() {
            result.push_str(&format!("{}", hunk));
        }

        result
    }

    /// Compare two texts under the configured whitespace rule
    pub fn compare_str(&self, expected: &str, actual: &str) -> CompareResult {
        let norm_expected = self.normalize(expected);
        let norm_actual = self.normalize(actual);

        if norm_expected == norm_actual {
            return CompareResult::Equal;
        }

        let index = norm_expected
            .iter()
            .zip(&norm_actual)
            .position(|(e, a)| e != a)
            .unwrap_or_else(|| norm_expected.len().min(norm_actual.len()));

        CompareResult::Different(Diff {
            first_diff_line: index + 1,
            expected_line: expected.lines().nth(index).map(str::to_string),
            actual_line: actual.lines().nth(index).map(str::to_string),
            unified_diff: Self::generate_unified_diff(expected, actual),
        })
    }

    /// Compare a captured file with an expected file, writing a log
    ///
    /// The log is empty on a match and holds the unified diff otherwise.
    pub fn compare_files(
        &self,
        captured: &Path,
        expected: &Path,
        log: &Path,
    ) -> Result<ComparisonOutcome, ComparisonError> {
        let actual = read_lossy(captured)?;
        let wanted = read_lossy(expected)?;
        let result = self.compare_str(&wanted, &actual);

        let contents = match &result {
            CompareResult::Equal => String::new(),
            CompareResult::Different(diff) => {
                format!("{}\n{}", diff.describe(), diff.unified_diff)
            }
        };
        fs::write(log, contents).map_err(|source| ComparisonError::WriteLog {
            path: log.to_path_buf(),
            source,
        })?;

        Ok(ComparisonOutcome {
            result,
            log: log.to_path_buf(),
        })
    }
}

fn read_lossy(path: &Path) -> Result<String, ComparisonError> {
    fs::read(path)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .map_err(|source| ComparisonError::Read {
            path: path.to_path_buf(),
            source,
        })
}
