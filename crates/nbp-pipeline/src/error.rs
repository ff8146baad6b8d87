// error.rs: Fatal errors of a publish run.
//
// Recoverable conditions (a single artifact failing to sanitize, a missing
// upstream on the first push, an empty change set) never show up here;
// they are handled inside the step that sees them.

use std::path::PathBuf;

use nbp_vcs::VcsError;
use thiserror::Error;

use crate::report::RunReport;

/// Errors that abort a publish run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The run was started without a usable commit message.
    #[error("invalid invocation: {0}")]
    InvalidInvocation(String),

    /// The project root is not under version control.
    #[error("{} is not inside a version-controlled working tree", .path.display())]
    NotARepository { path: PathBuf },

    /// Marking the change set for commit failed.
    #[error("staging failed: {0}")]
    StagingFailure(#[source] VcsError),

    /// The commit was refused for a reason other than an empty index.
    #[error("commit failed: {0}")]
    CommitFailure(#[source] VcsError),

    /// The push failed and could not be recovered.
    #[error("push of branch '{branch}' failed after {attempts} attempt(s): {source}")]
    PushFailure {
        branch: String,
        attempts: u8,
        source: VcsError,
    },

    /// Any other version-control failure (status query, tool missing, ...).
    #[error("version control error: {0}")]
    Vcs(#[from] VcsError),

    /// The config file exists but could not be read or parsed.
    #[error("invalid config at {}: {detail}", .path.display())]
    Config { path: PathBuf, detail: String },
}

impl PipelineError {
    /// What the user can do about it.
    pub fn remedy(&self) -> &'static str {
        match self {
            PipelineError::InvalidInvocation(_) => {
                "pass a non-empty commit message, e.g. nbpublish \"Update EDA notebook\""
            }
            PipelineError::NotARepository { .. } => {
                "run inside a git working tree or initialise one with `git init`"
            }
            PipelineError::StagingFailure(_) => {
                "check file permissions and that no other git process holds the index lock"
            }
            PipelineError::CommitFailure(_) => {
                "check the commit hooks and the git user.name/user.email configuration"
            }
            PipelineError::PushFailure { .. } => {
                "check remote access and credentials, then re-run; the commit is kept locally and only the push will be retried"
            }
            PipelineError::Vcs(VcsError::ToolMissing { .. }) => {
                "install git and make sure it is on PATH"
            }
            PipelineError::Vcs(_) => "inspect the repository with `git status` and re-run",
            PipelineError::Config { .. } => "fix or remove the config file",
        }
    }
}

/// A fatal error together with the report of everything done before it.
#[derive(Debug, Error)]
#[error("publish run failed: {error}")]
pub struct PipelineFailure {
    pub report: RunReport,
    #[source]
    pub error: PipelineError,
}
