//! Cleanup step
//!
//! Removes the artifact, captured output and comparison log of a fixture
//! after it passes. The runner never calls this after a failure, so a failing
//! fixture keeps all three files for inspection.

use std::fs;
use std::io::ErrorKind;

use tracing::debug;

use super::fixtures::FixtureContext;
use crate::error::CleanupError;

/// Remove every generated file of `ctx`. Already-missing files are fine.
pub fn cleanup(ctx: &FixtureContext) -> Result<(), CleanupError> {
    for path in ctx.generated() {
        match fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "removed"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(source) => {
                return Err(CleanupError {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
    }
    Ok(())
}
