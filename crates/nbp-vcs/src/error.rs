// error.rs: Error types for version-control operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while driving the version-control backend.
#[derive(Debug, Error)]
pub enum VcsError {
    /// The working directory is not inside a repository.
    #[error("{path} is not inside a version-controlled working tree")]
    NotARepository { path: PathBuf },

    /// The backend executable could not be started at all.
    #[error("`{tool}` could not be executed: {source}")]
    ToolMissing {
        tool: String,
        source: std::io::Error,
    },

    /// A backend command ran and exited non-zero.
    #[error("{command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// Push was refused because the branch has no upstream configured.
    #[error("branch has no upstream configured: {stderr}")]
    NoUpstream { stderr: String },

    /// HEAD does not point at a branch.
    #[error("HEAD is detached; check out a branch before publishing")]
    DetachedHead,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VcsError {
    /// True when the failure is the one cause a push retry can fix.
    pub fn is_missing_upstream(&self) -> bool {
        matches!(self, VcsError::NoUpstream { .. })
    }
}

pub type Result<T> = std::result::Result<T, VcsError>;
