//! Reporter - Console output for fixture runs
//!
//! Writes one line per case/variant outcome and a final verdict line:
//! - Human format, optionally colored via termcolor
//! - JSON lines for CI parsing
//!
//! Diagnostic logging goes through `tracing`; this module only carries the
//! results a person or CI job acts on.
//!
//! # Example
//!
//! ```rust,ignore
//! use fixture_gate::harness::{OutputFormat, Reporter};
//!
//! let mut reporter = Reporter::new()
//!     .with_format(OutputFormat::Human)
//!     .with_colors(false);
//! ```

use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use super::runner::{CaseOutcome, CaseStatus, RunReport, Verdict};

/// Output format for the reporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Human,
    /// JSON lines for CI parsing
    Json,
}

/// JSON entry for a single outcome
#[derive(Debug, Serialize)]
struct JsonOutcome<'a> {
    case: &'a str,
    variant: &'a str,
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exit_code: Option<i32>,
}

/// JSON entry for the final verdict
#[derive(Debug, Serialize)]
struct JsonSummary<'a> {
    verdict: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    case: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    variant: Option<&'a str>,
    completed: usize,
    total_ms: f64,
}

/// JSON entry echoing the captured output of a failing fixture
#[derive(Debug, Serialize)]
struct JsonCaptured<'a> {
    case: &'a str,
    variant: &'a str,
    captured: &'a str,
}

/// Output writer that can be colored or plain
enum OutputWriter {
    /// Standard stream with color support
    Colored(StandardStream),
    /// Plain writer (for testing)
    Plain(Box<dyn Write + Send>),
}

impl OutputWriter {
    fn write_colored(&mut self, spec: &ColorSpec, text: &str) -> io::Result<()> {
        match self {
            OutputWriter::Colored(stream) => {
                stream.set_color(spec)?;
                write!(stream, "{}", text)?;
                stream.reset()?;
                Ok(())
            }
            OutputWriter::Plain(writer) => {
                write!(writer, "{}", text)
            }
        }
    }

    fn write_plain(&mut self, text: &str) -> io::Result<()> {
        match self {
            OutputWriter::Colored(stream) => write!(stream, "{}", text),
            OutputWriter::Plain(writer) => write!(writer, "{}", text),
        }
    }

    fn newline(&mut self) -> io::Result<()> {
        match self {
            OutputWriter::Colored(stream) => writeln!(stream),
            OutputWriter::Plain(writer) => writeln!(writer),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputWriter::Colored(stream) => stream.flush(),
            OutputWriter::Plain(writer) => writer.flush(),
        }
    }
}

/// Console reporter for fixture runs
pub struct Reporter {
    /// Output destination
    output: OutputWriter,
    /// Output format (Human or JSON)
    format: OutputFormat,
    /// Whether to use colors
    colors: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter {
    /// Create a reporter writing human lines to stdout
    pub fn new() -> Self {
        Self {
            output: OutputWriter::Colored(StandardStream::stdout(ColorChoice::Auto)),
            format: OutputFormat::Human,
            colors: true,
        }
    }

    /// Set the output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set whether to use colors
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        if colors {
            self.output = OutputWriter::Colored(StandardStream::stdout(ColorChoice::Auto));
        } else {
            self.output = OutputWriter::Colored(StandardStream::stdout(ColorChoice::Never));
        }
        self
    }

    /// Set a custom output destination (disables colors)
    pub fn with_output<W: Write + Send + 'static>(mut self, output: W) -> Self {
        self.output = OutputWriter::Plain(Box::new(output));
        self.colors = false;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn line(&mut self, color: Option<Color>, text: &str) {
        match color {
            Some(color) if self.colors => {
                let mut spec = ColorSpec::new();
                spec.set_fg(Some(color)).set_bold(true);
                let _ = self.output.write_colored(&spec, text);
            }
            _ => {
                let _ = self.output.write_plain(text);
            }
        }
        let _ = self.output.newline();
    }

    fn json<T: Serialize>(&mut self, entry: &T) {
        if let Ok(json) = serde_json::to_string(entry) {
            let _ = self.output.write_plain(&json);
            let _ = self.output.newline();
        }
    }

    /// Report the outcome of one case/variant
    pub fn outcome(&mut self, outcome: &CaseOutcome) {
        match self.format {
            OutputFormat::Human => self.human_outcome(outcome),
            OutputFormat::Json => {
                let entry = JsonOutcome {
                    case: outcome.case.as_str(),
                    variant: outcome.variant.as_str(),
                    status: outcome.status.as_str(),
                    detail: outcome.status.detail(),
                    duration_ms: outcome.duration.map(|d| d.as_secs_f64() * 1000.0),
                    exit_code: outcome.exit_code,
                };
                self.json(&entry);
            }
        }
        let _ = self.output.flush();
    }

    fn human_outcome(&mut self, outcome: &CaseOutcome) {
        let label = outcome.variant.label();
        let case = &outcome.case;
        match &outcome.status {
            CaseStatus::Passed => {
                self.line(Some(Color::Green), &format!("{label} {case} Accepted!"));
            }
            CaseStatus::WrongAnswer { detail } => {
                self.line(Some(Color::Red), &format!("WA on {label} {case}"));
                self.line(None, &format!("  {detail}"));
            }
            CaseStatus::BuildFailed { reason, diagnostics } => {
                self.line(Some(Color::Red), &format!("Build failed on {label} {case}"));
                self.line(None, &format!("  {reason}"));
                if let Some(diagnostics) = diagnostics {
                    for l in diagnostics.lines() {
                        self.line(None, &format!("    {l}"));
                    }
                }
            }
            CaseStatus::LaunchFailed { reason } => {
                self.line(Some(Color::Red), &format!("Launch failed on {label} {case}"));
                self.line(None, &format!("  {reason}"));
            }
        }
    }

    /// Echo the captured output of a failing fixture
    pub fn captured_output(&mut self, outcome: &CaseOutcome, captured: &str) {
        match self.format {
            OutputFormat::Human => {
                self.line(
                    Some(Color::Cyan),
                    &format!("Output of {} {}:", outcome.variant.label(), outcome.case),
                );
                let _ = self.output.write_plain(captured);
                if !captured.is_empty() && !captured.ends_with('\n') {
                    let _ = self.output.newline();
                }
            }
            OutputFormat::Json => {
                let entry = JsonCaptured {
                    case: outcome.case.as_str(),
                    variant: outcome.variant.as_str(),
                    captured,
                };
                self.json(&entry);
            }
        }
        let _ = self.output.flush();
    }

    /// Report the final verdict
    pub fn finish(&mut self, report: &RunReport) {
        match self.format {
            OutputFormat::Human => {
                if report.verdict == Verdict::AllPassed {
                    self.line(Some(Color::Green), "Passed all tests!");
                }
            }
            OutputFormat::Json => {
                let (verdict, case, variant) = match &report.verdict {
                    Verdict::AllPassed => ("all_passed", None, None),
                    Verdict::Failed { case, variant } => {
                        ("failed", Some(case.as_str()), Some(variant.as_str()))
                    }
                };
                let entry = JsonSummary {
                    verdict,
                    case,
                    variant,
                    completed: report.outcomes.len(),
                    total_ms: report.duration.as_secs_f64() * 1000.0,
                };
                self.json(&entry);
            }
        }
        let _ = self.output.flush();
    }
}
