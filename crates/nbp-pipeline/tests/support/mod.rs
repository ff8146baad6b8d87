// Shared fakes for pipeline tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

use nbp_sanitize::{Capability, InstallHook, SanitizeError, Sanitizer};
use nbp_vcs::{ChangeEntry, ChangeSet, ChangeStatus, VcsError, VersionControl};

/// How a scripted push responds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Ok,
    NoUpstream,
    Fail,
}

/// A version-control backend that follows a script and records every call.
pub struct ScriptedVcs {
    pub repository: bool,
    /// Reported repository root, also where the sanitize pass scans.
    pub root: PathBuf,
    pub changes: ChangeSet,
    pub stage_fails: bool,
    pub stage_is_noop: bool,
    pub commit_fails: bool,
    pub detached: bool,
    pub pending: bool,
    pub upstream_fix: Step,
    pushes: Mutex<VecDeque<Step>>,
    staged: Mutex<bool>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedVcs {
    pub fn with_changes(paths: &[&str]) -> Self {
        Self {
            repository: true,
            root: PathBuf::from("/nonexistent-nbp-repo"),
            changes: paths
                .iter()
                .map(|p| ChangeEntry::new(*p, ChangeStatus::Modified))
                .collect(),
            stage_fails: false,
            stage_is_noop: false,
            commit_fails: false,
            detached: false,
            pending: false,
            upstream_fix: Step::Ok,
            pushes: Mutex::new(VecDeque::from([Step::Ok])),
            staged: Mutex::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn clean() -> Self {
        Self::with_changes(&[])
    }

    pub fn at(mut self, root: &Path) -> Self {
        self.root = root.to_path_buf();
        self
    }

    pub fn not_a_repo(mut self) -> Self {
        self.repository = false;
        self
    }

    pub fn failing_stage(mut self) -> Self {
        self.stage_fails = true;
        self
    }

    pub fn failing_commit(mut self) -> Self {
        self.commit_fails = true;
        self
    }

    pub fn noop_stage(mut self) -> Self {
        self.stage_is_noop = true;
        self
    }

    pub fn detached(mut self) -> Self {
        self.detached = true;
        self
    }

    pub fn pending(mut self) -> Self {
        self.pending = true;
        self
    }

    pub fn pushes(self, steps: &[Step]) -> Self {
        *self.pushes.lock().unwrap() = steps.iter().copied().collect();
        self
    }

    pub fn upstream_fix(mut self, step: Step) -> Self {
        self.upstream_fix = step;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == name).count()
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }

    fn failure(command: &str) -> VcsError {
        VcsError::CommandFailed {
            command: command.to_string(),
            stderr: "scripted failure".to_string(),
        }
    }
}

impl VersionControl for ScriptedVcs {
    fn ensure_repository(&self) -> nbp_vcs::Result<PathBuf> {
        self.record("ensure_repository");
        if self.repository {
            Ok(self.root.clone())
        } else {
            Err(VcsError::NotARepository {
                path: self.root.clone(),
            })
        }
    }

    fn status(&self) -> nbp_vcs::Result<ChangeSet> {
        self.record("status");
        Ok(self.changes.clone())
    }

    fn stage(&self, _paths: &[&str]) -> nbp_vcs::Result<()> {
        self.record("stage");
        if self.stage_fails {
            return Err(Self::failure("git add"));
        }
        if !self.stage_is_noop {
            *self.staged.lock().unwrap() = true;
        }
        Ok(())
    }

    fn unstage(&self, _paths: &[&str]) -> nbp_vcs::Result<()> {
        self.record("unstage");
        *self.staged.lock().unwrap() = false;
        Ok(())
    }

    fn has_staged_changes(&self) -> nbp_vcs::Result<bool> {
        self.record("has_staged_changes");
        Ok(*self.staged.lock().unwrap())
    }

    fn commit(&self, _message: &str) -> nbp_vcs::Result<String> {
        self.record("commit");
        if self.commit_fails {
            return Err(Self::failure("git commit"));
        }
        *self.staged.lock().unwrap() = false;
        Ok("abc1234".to_string())
    }

    fn current_branch(&self) -> nbp_vcs::Result<String> {
        self.record("current_branch");
        if self.detached {
            Err(VcsError::DetachedHead)
        } else {
            Ok("main".to_string())
        }
    }

    fn push(&self) -> nbp_vcs::Result<()> {
        self.record("push");
        let step = self.pushes.lock().unwrap().pop_front().unwrap_or(Step::Fail);
        match step {
            Step::Ok => Ok(()),
            Step::NoUpstream => Err(VcsError::NoUpstream {
                stderr: "fatal: The current branch main has no upstream branch.".to_string(),
            }),
            Step::Fail => Err(Self::failure("git push")),
        }
    }

    fn push_set_upstream(&self, _remote: &str, _branch: &str) -> nbp_vcs::Result<()> {
        self.record("push_set_upstream");
        match self.upstream_fix {
            Step::Ok => Ok(()),
            Step::NoUpstream => Err(VcsError::NoUpstream {
                stderr: "still no upstream".to_string(),
            }),
            Step::Fail => Err(Self::failure("git push --set-upstream")),
        }
    }

    fn has_pending_push(&self, _remote: &str) -> nbp_vcs::Result<bool> {
        self.record("has_pending_push");
        Ok(self.pending)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// In-process stand-in for nbstripout: clears outputs and execution
/// counts of code cells and writes the notebook back in a stable layout.
pub fn strip_outputs(path: &Path) -> Result<(), SanitizeError> {
    let io = |source| SanitizeError::IoError {
        path: path.to_path_buf(),
        source,
    };
    let raw = std::fs::read_to_string(path).map_err(io)?;
    let mut nb: serde_json::Value =
        serde_json::from_str(&raw).map_err(|e| SanitizeError::ToolFailed {
            tool: "strip".to_string(),
            path: path.to_path_buf(),
            stderr: e.to_string(),
        })?;
    if let Some(cells) = nb.get_mut("cells").and_then(|c| c.as_array_mut()) {
        for cell in cells {
            if cell["cell_type"] == "code" {
                cell["outputs"] = serde_json::json!([]);
                cell["execution_count"] = serde_json::Value::Null;
            }
        }
    }
    let out = serde_json::to_string_pretty(&nb).unwrap() + "\n";
    std::fs::write(path, out).map_err(io)
}

/// Notebook JSON with one code cell. `output` adds a stream output and an
/// execution count.
pub fn notebook(source: &str, output: Option<&str>) -> String {
    let mut nb = serde_json::json!({
        "cells": [{
            "cell_type": "code",
            "execution_count": null,
            "metadata": {},
            "outputs": [],
            "source": [source],
        }],
        "metadata": {},
        "nbformat": 4,
        "nbformat_minor": 5,
    });
    if let Some(text) = output {
        nb["cells"][0]["execution_count"] = serde_json::json!(1);
        nb["cells"][0]["outputs"] = serde_json::json!([{
            "name": "stdout",
            "output_type": "stream",
            "text": [text],
        }]);
    }
    serde_json::to_string_pretty(&nb).unwrap() + "\n"
}

/// Sanitizer that runs [`strip_outputs`] in-process and records each call.
#[derive(Default)]
pub struct StripSanitizer {
    pub missing: bool,
    calls: Mutex<Vec<PathBuf>>,
}

impl StripSanitizer {
    pub fn available() -> Self {
        Self::default()
    }

    pub fn missing() -> Self {
        Self {
            missing: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl Sanitizer for StripSanitizer {
    fn detect(&self) -> Capability {
        if self.missing {
            Capability::NotFound {
                program: "strip".to_string(),
                install: None,
            }
        } else {
            Capability::Available(PathBuf::from("strip"))
        }
    }

    fn provision(&self, hook: &InstallHook) -> Result<(), SanitizeError> {
        Err(SanitizeError::ProvisionFailed {
            command: hook.to_string(),
            detail: "not supported in tests".to_string(),
        })
    }

    fn sanitize(&self, _tool: &Path, artifact: &Path) -> Result<(), SanitizeError> {
        self.calls.lock().unwrap().push(artifact.to_path_buf());
        strip_outputs(artifact)
    }

    fn name(&self) -> &str {
        "strip"
    }
}

pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Initialise a repository on `main` with one commit and isolated config.
pub fn init_git_repo(dir: &Path) {
    git(dir, &["init", "-q"]);
    git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(dir, &["config", "user.name", "Test User"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
    git(dir, &["config", "push.autoSetupRemote", "false"]);
    git(dir, &["config", "push.default", "simple"]);

    std::fs::write(dir.join("README.md"), "# Test\n").unwrap();
    git(dir, &["add", "."]);
    git(dir, &["commit", "-q", "-m", "Initial commit"]);
}

/// Create a bare repository and register it as `origin` of `work`.
pub fn add_bare_remote(work: &Path, bare: &Path) {
    git(bare, &["init", "-q", "--bare"]);
    let url = bare.to_string_lossy().to_string();
    git(work, &["remote", "add", "origin", &url]);
}
