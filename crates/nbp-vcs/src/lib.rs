//! # nbp-vcs
//!
//! Version-control capability for the nbpublish pipeline.
//!
//! The pipeline never talks to git directly. It goes through the
//! [`VersionControl`] trait, which covers exactly the operations a publish
//! run needs: repository check, status, staging, commit, branch lookup and
//! push (with or without setting an upstream). [`GitVcs`] is the built-in
//! backend and shells out to the `git` binary.

pub mod adapter;
pub mod change;
pub mod config;
pub mod error;
pub mod git;

pub use adapter::VersionControl;
pub use change::{ChangeEntry, ChangeSet, ChangeStatus};
pub use config::GitConfig;
pub use error::{Result, VcsError};
pub use git::GitVcs;
