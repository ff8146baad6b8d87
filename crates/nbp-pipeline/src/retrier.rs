// retrier.rs: Push with one bounded retry for a missing upstream.
//
// State machine:
//   Attempt1     push; ok → Pushed; no upstream → FixUpstream; else → Failed
//   FixUpstream  push --set-upstream <remote> <branch>;
//                ok → PushedAfterUpstreamFix; else → Failed
//
// Authentication, network and rejection errors go straight to Failed.

use nbp_vcs::VersionControl;
use serde::Serialize;

use crate::error::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PushStatus {
    Pushed,
    PushedAfterUpstreamFix,
    Failed,
}

/// Result of the push step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushOutcome {
    pub status: PushStatus,
    pub branch: String,
    /// Push commands issued, 1 or 2.
    pub attempts: u8,
}

impl PushOutcome {
    pub fn failed(branch: impl Into<String>, attempts: u8) -> Self {
        Self {
            status: PushStatus::Failed,
            branch: branch.into(),
            attempts,
        }
    }
}

/// Pushes the current branch to its remote.
pub struct PublishRetrier<'a> {
    vcs: &'a dyn VersionControl,
    remote: String,
}

impl<'a> PublishRetrier<'a> {
    pub fn new(vcs: &'a dyn VersionControl, remote: impl Into<String>) -> Self {
        Self {
            vcs,
            remote: remote.into(),
        }
    }

    pub fn publish(&self) -> Result<PushOutcome, PipelineError> {
        let branch = self
            .vcs
            .current_branch()
            .map_err(|source| PipelineError::PushFailure {
                branch: "HEAD".to_string(),
                attempts: 0,
                source,
            })?;

        match self.vcs.push() {
            Ok(()) => {
                tracing::info!("pushed {}", branch);
                Ok(PushOutcome {
                    status: PushStatus::Pushed,
                    branch,
                    attempts: 1,
                })
            }
            Err(e) if e.is_missing_upstream() => {
                tracing::warn!(
                    "{} has no upstream, setting it to {}/{} and retrying",
                    branch,
                    self.remote,
                    branch
                );
                match self.vcs.push_set_upstream(&self.remote, &branch) {
                    Ok(()) => Ok(PushOutcome {
                        status: PushStatus::PushedAfterUpstreamFix,
                        branch,
                        attempts: 2,
                    }),
                    Err(source) => Err(PipelineError::PushFailure {
                        branch,
                        attempts: 2,
                        source,
                    }),
                }
            }
            Err(source) => Err(PipelineError::PushFailure {
                branch,
                attempts: 1,
                source,
            }),
        }
    }
}
