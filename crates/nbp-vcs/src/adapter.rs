//! Core VersionControl trait

use std::path::PathBuf;

use crate::change::ChangeSet;
use crate::error::Result;

/// The version-control operations a publish run depends on.
///
/// Any backend implementing this trait can drive the pipeline. All calls
/// are blocking and operate on the backend's working tree.
pub trait VersionControl: Send + Sync {
    /// Confirm the working tree is under version control.
    ///
    /// Returns the repository root. Fails with
    /// [`VcsError::NotARepository`](crate::VcsError::NotARepository) otherwise.
    fn ensure_repository(&self) -> Result<PathBuf>;

    /// Changes relative to the last commit, including untracked files.
    fn status(&self) -> Result<ChangeSet>;

    /// Mark the given root-relative paths for inclusion in the next commit.
    fn stage(&self, paths: &[&str]) -> Result<()>;

    /// Remove the given paths from the index again, leaving the files alone.
    fn unstage(&self, paths: &[&str]) -> Result<()>;

    /// Whether the index differs from the last commit.
    fn has_staged_changes(&self) -> Result<bool>;

    /// Create a commit from the index. Returns the new commit id.
    fn commit(&self, message: &str) -> Result<String>;

    /// Name of the checked-out branch.
    fn current_branch(&self) -> Result<String>;

    /// Push the current branch to its upstream.
    ///
    /// Fails with [`VcsError::NoUpstream`](crate::VcsError::NoUpstream) when
    /// the branch is not tracking anything.
    fn push(&self) -> Result<()>;

    /// Push `branch` to `remote` and record it as the branch's upstream.
    fn push_set_upstream(&self, remote: &str, branch: &str) -> Result<()>;

    /// Whether the current branch has commits that have not reached
    /// `remote` yet.
    fn has_pending_push(&self, remote: &str) -> Result<bool>;

    /// Backend display name (for logs and reports).
    fn name(&self) -> &str;
}
