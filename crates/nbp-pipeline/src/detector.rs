//! Change detection over the working tree

use std::path::PathBuf;

use nbp_vcs::{ChangeSet, VcsError, VersionControl};

use crate::error::PipelineError;

/// Reports what changed since the last commit.
pub struct ChangeDetector<'a> {
    vcs: &'a dyn VersionControl,
}

impl<'a> ChangeDetector<'a> {
    pub fn new(vcs: &'a dyn VersionControl) -> Self {
        Self { vcs }
    }

    /// Gate for the whole run: fails with `NotARepository` when the tree is
    /// not under version control.
    pub fn ensure_repository(&self) -> Result<PathBuf, PipelineError> {
        self.vcs.ensure_repository().map_err(|e| match e {
            VcsError::NotARepository { path } => PipelineError::NotARepository { path },
            other => PipelineError::Vcs(other),
        })
    }

    /// Current change set. Empty means there is nothing to commit.
    pub fn detect(&self) -> Result<ChangeSet, PipelineError> {
        let changes = self.vcs.status()?;
        tracing::info!("detected {} changed path(s)", changes.len());
        Ok(changes)
    }
}
