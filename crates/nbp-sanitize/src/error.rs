// error.rs: Error types for artifact discovery and sanitization.
//
// None of these abort a publish run: the runner downgrades every one of
// them to a warning in the run report.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SanitizeError {
    /// Reading the working tree failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The sanitizer executable could not be started.
    #[error("failed to start {tool}: {source}")]
    SpawnFailed {
        tool: String,
        source: std::io::Error,
    },

    /// The sanitizer ran and rejected the artifact.
    #[error("{tool} failed on {path}: {stderr}")]
    ToolFailed {
        tool: String,
        path: PathBuf,
        stderr: String,
    },

    /// The install hook did not succeed.
    #[error("provisioning with `{command}` failed: {detail}")]
    ProvisionFailed { command: String, detail: String },
}
