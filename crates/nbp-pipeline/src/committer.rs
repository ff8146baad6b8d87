// committer.rs: Stage a change set and commit it.
//
// Either the commit exists with exactly the staged paths, or the index is
// put back the way it was found. Staging something and then leaving it
// uncommitted would let a later push publish an inconsistent state.

use nbp_vcs::VersionControl;
use serde::Serialize;

use crate::error::PipelineError;
use crate::request::CommitRequest;

/// Why a commit was or was not created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitReason {
    Success,
    /// Staging left the index identical to HEAD.
    NothingToCommit,
    /// The backend refused the commit.
    Rejected,
}

/// Result of a commit attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitResult {
    pub committed: bool,
    pub reason: CommitReason,
    /// Short id of the new commit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,
}

impl CommitResult {
    pub fn success(commit_id: impl Into<String>) -> Self {
        Self {
            committed: true,
            reason: CommitReason::Success,
            commit_id: Some(commit_id.into()),
        }
    }

    pub fn nothing_to_commit() -> Self {
        Self {
            committed: false,
            reason: CommitReason::NothingToCommit,
            commit_id: None,
        }
    }

    pub fn rejected() -> Self {
        Self {
            committed: false,
            reason: CommitReason::Rejected,
            commit_id: None,
        }
    }
}

/// Stages a [`CommitRequest`]'s files and commits them.
pub struct StagingCommitter<'a> {
    vcs: &'a dyn VersionControl,
}

impl<'a> StagingCommitter<'a> {
    pub fn new(vcs: &'a dyn VersionControl) -> Self {
        Self { vcs }
    }

    pub fn commit(&self, request: &CommitRequest) -> Result<CommitResult, PipelineError> {
        if request.files().is_empty() {
            return Ok(CommitResult::nothing_to_commit());
        }

        let paths = request.files().staging_paths();
        if let Err(e) = self.vcs.stage(&paths) {
            self.rollback(&paths);
            return Err(PipelineError::StagingFailure(e));
        }

        let staged = match self.vcs.has_staged_changes() {
            Ok(staged) => staged,
            Err(e) => {
                self.rollback(&paths);
                return Err(e.into());
            }
        };
        if !staged {
            tracing::info!("index matches HEAD after staging, nothing to commit");
            return Ok(CommitResult::nothing_to_commit());
        }

        match self.vcs.commit(request.message()) {
            Ok(commit_id) => {
                tracing::info!("committed {} path(s) as {}", paths.len(), commit_id);
                Ok(CommitResult::success(commit_id))
            }
            Err(e) => {
                // Someone else may have committed the index between our
                // check and the commit.
                if matches!(self.vcs.has_staged_changes(), Ok(false)) {
                    tracing::info!("index emptied before commit, nothing to commit");
                    return Ok(CommitResult::nothing_to_commit());
                }
                self.rollback(&paths);
                Err(PipelineError::CommitFailure(e))
            }
        }
    }

    fn rollback(&self, paths: &[&str]) {
        if let Err(e) = self.vcs.unstage(paths) {
            tracing::warn!("could not unstage {} path(s): {}", paths.len(), e);
        }
    }
}
