//! Shared helpers for integration tests.
//!
//! Fixture "sources" here are not C++: a stand-in compiler turns each source
//! into a shell script that prints the source verbatim, so the expected
//! output of a passing case is simply its source text. A source that starts
//! with `#!` is copied as the artifact as-is.

#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fixture_gate::prelude::*;
use tempfile::TempDir;

/// Marker that makes the test toolchains fail the build
pub const BUILD_ERROR: &str = "#error";

/// Marker that makes the fake compiler succeed without writing an artifact
pub const NO_ARTIFACT: &str = "#no-artifact";

/// A temporary project root with a `data/` fixture tree
pub struct FixtureTree {
    dir: TempDir,
}

impl FixtureTree {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        fs::create_dir(dir.path().join("data")).expect("create data dir");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn data(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    /// Directory of a case variant, e.g. `data/b.memcheck`
    pub fn variant_dir(&self, name: &str, variant: Variant) -> PathBuf {
        self.data().join(format!("{name}{}", variant.dir_suffix()))
    }

    /// Add a case whose program output matches the answer in both variants
    pub fn passing(&self, name: &str, output: &str) -> &Self {
        self.variant(name, Variant::Standard, output, output);
        self.variant(name, Variant::MemCheck, output, output)
    }

    /// Write one variant's source and expected answer
    pub fn variant(&self, name: &str, variant: Variant, source: &str, answer: &str) -> &Self {
        let dir = self.variant_dir(name, variant);
        fs::create_dir_all(&dir).expect("create fixture dir");
        fs::write(dir.join("code.cpp"), source).expect("write source");
        fs::write(dir.join("answer.txt"), answer).expect("write answer");
        self
    }

    /// Names of files currently in a variant directory, sorted
    pub fn files_in(&self, name: &str, variant: Variant) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.variant_dir(name, variant))
            .expect("read fixture dir")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Write a stand-in compiler script and return a toolchain config for it
    ///
    /// The script accepts the real argument shape
    /// (`flags... source -I<dir> -o artifact`) and is run through `sh`, so
    /// no file this process wrote is ever executed directly.
    pub fn fake_toolchain(&self) -> ToolchainConfig {
        let path = self.root().join("fakecc.sh");
        let script = format!(
            r##"out=""
src=""
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift 2 ;;
    -*) shift ;;
    *) src="$1"; shift ;;
  esac
done
if [ ! -f "$src" ]; then
  echo "$src: No such file or directory" >&2
  exit 1
fi
if grep -q '{BUILD_ERROR}' "$src"; then
  echo "$src:1: error: requested failure" >&2
  exit 1
fi
if grep -q '{NO_ARTIFACT}' "$src"; then
  exit 0
fi
if head -c 2 "$src" | grep -q '#!'; then
  cp "$src" "$out"
else
  printf '#!/bin/sh\ncat "%s"\n' "$src" > "$out"
fi
chmod +x "$out"
"##
        );
        fs::write(&path, script).expect("write fake compiler");
        ToolchainConfig {
            compiler: "sh".to_string(),
            flags: vec![path.display().to_string()],
            ..ToolchainConfig::default()
        }
    }
}

/// Toolchain that records every build before delegating to the fake compiler
pub struct RecordingToolchain {
    inner: CompilerToolchain,
    builds: RefCell<Vec<(String, Variant)>>,
}

impl RecordingToolchain {
    pub fn new(tree: &FixtureTree) -> Self {
        Self {
            inner: CompilerToolchain::new(tree.fake_toolchain()),
            builds: RefCell::new(Vec::new()),
        }
    }

    pub fn built(&self) -> Vec<(String, Variant)> {
        self.builds.borrow().clone()
    }

    /// Distinct case names built, in order
    pub fn built_cases(&self) -> Vec<String> {
        let mut names: Vec<String> = self.built().into_iter().map(|(n, _)| n).collect();
        names.dedup();
        names
    }
}

impl Toolchain for RecordingToolchain {
    fn build(&self, ctx: &FixtureContext) -> Result<BuildArtifact, BuildError> {
        self.builds
            .borrow_mut()
            .push((ctx.case().to_string(), ctx.variant()));
        self.inner.build(ctx)
    }
}

/// A thread-safe buffer for capturing reporter output
#[derive(Clone, Default)]
pub struct TestBuffer {
    inner: Arc<parking_lot::Mutex<Vec<u8>>>,
}

impl TestBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8(self.inner.lock().clone()).expect("utf-8 output")
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn reporter(&self) -> Reporter {
        Reporter::new().with_output(self.clone())
    }
}

impl Write for TestBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Compact (case, variant, status) view of a report
pub fn summary(report: &RunReport) -> Vec<(String, Variant, &'static str)> {
    report
        .outcomes
        .iter()
        .map(|o| (o.case.to_string(), o.variant, o.status.as_str()))
        .collect()
}
