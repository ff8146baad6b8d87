// orchestrator.rs: The publish run, start to finish.
//
// Sequence:
//   1. validate the commit message      (fatal, before any side effect)
//   2. confirm the tree is a repository (fatal, before any side effect)
//   3. sanitize artifacts               (best-effort)
//   4. detect changes                   (empty → no-op, or push pending commits)
//   5. stage + commit                   (fatal on failure, no push)
//   6. push                             (one bounded retry)
//
// The first fatal error stops the run. A report comes back either way.

use std::path::{Path, PathBuf};

use nbp_sanitize::{ArtifactSanitizer, Sanitizer};
use nbp_vcs::VersionControl;

use crate::committer::{CommitReason, CommitResult, StagingCommitter};
use crate::config::PublishConfig;
use crate::detector::ChangeDetector;
use crate::error::{PipelineError, PipelineFailure};
use crate::report::{RunReport, RunStatus};
use crate::request::{validate_message, CommitRequest};
use crate::retrier::{PublishRetrier, PushOutcome};

/// Runs the publish pipeline over one working tree.
///
/// Assumes exclusive access to the working tree for the duration of
/// [`run`](Self::run); nothing here locks it.
pub struct PipelineOrchestrator<'a> {
    vcs: &'a dyn VersionControl,
    sanitizer: &'a dyn Sanitizer,
    config: &'a PublishConfig,
    project_root: PathBuf,
}

impl<'a> PipelineOrchestrator<'a> {
    pub fn new(
        vcs: &'a dyn VersionControl,
        sanitizer: &'a dyn Sanitizer,
        config: &'a PublishConfig,
        project_root: impl AsRef<Path>,
    ) -> Self {
        Self {
            vcs,
            sanitizer,
            config,
            project_root: project_root.as_ref().to_path_buf(),
        }
    }

    pub fn run(&self, message: &str) -> Result<RunReport, PipelineFailure> {
        let mut report = RunReport::start();
        match self.execute(message, &mut report) {
            Ok(status) => {
                report.finish(status);
                tracing::info!("publish run finished: {}", report.status);
                Ok(report)
            }
            Err(error) => {
                tracing::error!("publish run failed: {}", error);
                report.error = Some(error.to_string());
                report.finish(RunStatus::Failed);
                Err(PipelineFailure { report, error })
            }
        }
    }

    fn execute(&self, message: &str, report: &mut RunReport) -> Result<RunStatus, PipelineError> {
        validate_message(message)?;

        let detector = ChangeDetector::new(self.vcs);
        let repo_root = detector.ensure_repository()?;
        tracing::info!(
            "publishing {} (repository {})",
            self.project_root.display(),
            repo_root.display()
        );

        // Detection and staging cover the whole repository, so the scan does too.
        let sanitizer = ArtifactSanitizer::new(self.sanitizer, &self.config.sanitize);
        report.sanitize = Some(sanitizer.run(&repo_root));

        let changes = detector.detect()?;
        report.changes = changes.clone();
        if changes.is_empty() {
            return self.publish_pending(report);
        }

        let request = CommitRequest::new(message, changes)?;
        let committer = StagingCommitter::new(self.vcs);
        let commit = match committer.commit(&request) {
            Ok(commit) => commit,
            Err(e) => {
                if matches!(e, PipelineError::CommitFailure(_)) {
                    report.commit = Some(CommitResult::rejected());
                }
                return Err(e);
            }
        };
        let nothing_committed = commit.reason == CommitReason::NothingToCommit;
        if !nothing_committed {
            report.files_staged = request.files().staging_paths().len();
        }
        report.commit = Some(commit);
        if nothing_committed {
            return self.publish_pending(report);
        }

        self.push(report)?;
        Ok(RunStatus::Published)
    }

    /// Nothing to commit: push earlier commits that never reached the
    /// remote, otherwise finish as a no-op.
    fn publish_pending(&self, report: &mut RunReport) -> Result<RunStatus, PipelineError> {
        let pending = match self.vcs.has_pending_push(&self.config.git.remote) {
            Ok(pending) => pending,
            Err(e) => {
                tracing::warn!("could not check for unpushed commits: {}", e);
                false
            }
        };
        if !pending {
            tracing::info!("nothing to publish");
            return Ok(RunStatus::NoChanges);
        }

        tracing::info!("working tree clean but branch has unpushed commits");
        self.push(report)?;
        Ok(RunStatus::PublishedPending)
    }

    fn push(&self, report: &mut RunReport) -> Result<(), PipelineError> {
        let retrier = PublishRetrier::new(self.vcs, self.config.git.remote.clone());
        match retrier.publish() {
            Ok(outcome) => {
                report.push = Some(outcome);
                Ok(())
            }
            Err(e) => {
                if let PipelineError::PushFailure { branch, attempts, .. } = &e {
                    report.push = Some(PushOutcome::failed(branch.clone(), *attempts));
                }
                Err(e)
            }
        }
    }
}
