// report.rs: Observational summary of one publish run.
//
// The report is filled in step by step and returned whether the run
// succeeded, exited early or failed. Nothing reads it back during a run.

use std::fmt;

use chrono::{DateTime, Utc};
use nbp_sanitize::{SanitizeSummary, SanitizerStatus};
use nbp_vcs::ChangeSet;
use serde::Serialize;

use crate::committer::{CommitReason, CommitResult};
use crate::retrier::{PushOutcome, PushStatus};

/// Final state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The run has not reached a final state yet.
    InProgress,
    /// Changes were committed and pushed.
    Published,
    /// Nothing new to commit; earlier unpushed commits were pushed.
    PublishedPending,
    /// Nothing to commit and nothing to push.
    NoChanges,
    Failed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunStatus::InProgress => "in progress",
            RunStatus::Published => "published",
            RunStatus::PublishedPending => "published pending commits",
            RunStatus::NoChanges => "no changes",
            RunStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Absent when the run stopped before the sanitize step.
    pub sanitize: Option<SanitizeSummary>,
    pub changes: ChangeSet,
    pub files_staged: usize,
    pub commit: Option<CommitResult>,
    pub push: Option<PushOutcome>,
    pub error: Option<String>,
}

impl RunReport {
    pub fn start() -> Self {
        Self {
            status: RunStatus::InProgress,
            started_at: Utc::now(),
            finished_at: None,
            sanitize: None,
            changes: ChangeSet::new(),
            files_staged: 0,
            commit: None,
            push: None,
            error: None,
        }
    }

    pub fn finish(&mut self, status: RunStatus) {
        self.status = status;
        self.finished_at = Some(Utc::now());
    }

    pub fn artifacts_sanitized(&self) -> usize {
        self.sanitize.as_ref().map_or(0, |s| s.sanitized)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Publish run: {}", self.status)?;

        match &self.sanitize {
            None => writeln!(f, "Sanitize:    not run")?,
            Some(s) => {
                match &s.status {
                    SanitizerStatus::Completed => writeln!(
                        f,
                        "Sanitize:    {}/{} artifact(s) sanitized{}",
                        s.sanitized,
                        s.discovered,
                        if s.provisioned { " (tool installed)" } else { "" }
                    )?,
                    SanitizerStatus::Disabled => writeln!(f, "Sanitize:    disabled")?,
                    SanitizerStatus::NoArtifacts => writeln!(f, "Sanitize:    no artifacts found")?,
                    SanitizerStatus::Skipped(reason) => writeln!(
                        f,
                        "Sanitize:    skipped for {} artifact(s): {}",
                        s.discovered, reason
                    )?,
                }
                for failure in &s.failures {
                    writeln!(f, "  ! {}: {}", failure.path, failure.reason)?;
                }
            }
        }

        writeln!(f, "Changes:     {} file(s)", self.changes.len())?;
        for entry in &self.changes {
            match &entry.original_path {
                Some(orig) => writeln!(f, "  {} {} -> {}", entry.status.code(), orig, entry.path)?,
                None => writeln!(f, "  {} {}", entry.status.code(), entry.path)?,
            }
        }

        match &self.commit {
            None => writeln!(f, "Commit:      none")?,
            Some(c) => match c.reason {
                CommitReason::Success => writeln!(
                    f,
                    "Commit:      {} ({} path(s) staged)",
                    c.commit_id.as_deref().unwrap_or("?"),
                    self.files_staged
                )?,
                CommitReason::NothingToCommit => writeln!(f, "Commit:      nothing to commit")?,
                CommitReason::Rejected => writeln!(f, "Commit:      rejected")?,
            },
        }

        match &self.push {
            None => writeln!(f, "Push:        not attempted")?,
            Some(p) => match p.status {
                PushStatus::Pushed => writeln!(f, "Push:        pushed {}", p.branch)?,
                PushStatus::PushedAfterUpstreamFix => {
                    writeln!(f, "Push:        pushed {} after setting upstream", p.branch)?
                }
                PushStatus::Failed => writeln!(
                    f,
                    "Push:        failed for {} after {} attempt(s)",
                    p.branch, p.attempts
                )?,
            },
        }

        if let Some(error) = &self.error {
            writeln!(f, "Error:       {}", error)?;
        }
        Ok(())
    }
}
