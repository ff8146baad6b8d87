//! Git backend for the publish pipeline

use std::path::{Path, PathBuf};
use std::io::Write;
use std::process::{Command, Output, Stdio};

use crate::adapter::VersionControl;
use crate::change::ChangeSet;
use crate::error::{Result, VcsError};

/// Stderr fragments git prints when a branch has nothing to push to.
const NO_UPSTREAM_MARKERS: &[&str] = &["has no upstream branch", "no upstream configured"];

/// Git backend that shells out to the `git` executable.
pub struct GitVcs {
    /// Working directory for git operations
    work_dir: PathBuf,
}

impl GitVcs {
    /// Create a new GitVcs for the given working directory
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Spawn git in `dir` and collect its output, whatever the exit code.
    fn run_in(&self, dir: &Path, args: &[&str]) -> Result<Output> {
        tracing::debug!("git {}", args.join(" "));
        Command::new("git")
            .args(args)
            .current_dir(dir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(spawn_error)
    }

    /// Run a git command in `dir`, failing on non-zero exit.
    fn git_in(&self, dir: &Path, args: &[&str]) -> Result<String> {
        let output = self.run_in(dir, args)?;
        if !output.status.success() {
            return Err(command_failed(args, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run a git command in the working directory
    fn git_cmd(&self, args: &[&str]) -> Result<String> {
        self.git_in(&self.work_dir, args)
    }

    /// Repository root; pathspecs from `status` are relative to it.
    fn toplevel(&self) -> Result<PathBuf> {
        self.git_cmd(&["rev-parse", "--show-toplevel"])
            .map(PathBuf::from)
    }

    fn has_head(&self) -> Result<bool> {
        let output = self.run_in(&self.work_dir, &["rev-parse", "--verify", "-q", "HEAD"])?;
        Ok(output.status.success())
    }

    /// Run a path-taking command from the repository root with literal
    /// pathspecs. Paths go over stdin, NUL-separated, so the change set size
    /// is not bounded by the argument list limit.
    fn git_paths(&self, prefix: &[&str], paths: &[&str]) -> Result<()> {
        let root = self.toplevel()?;
        let mut args = vec!["--literal-pathspecs"];
        args.extend_from_slice(prefix);
        args.extend_from_slice(&["--pathspec-from-file=-", "--pathspec-file-nul"]);

        let mut input = Vec::new();
        for path in paths {
            input.extend_from_slice(path.as_bytes());
            input.push(0);
        }

        tracing::debug!("git {} ({} path(s) on stdin)", args.join(" "), paths.len());
        let mut child = Command::new("git")
            .args(&args)
            .current_dir(&root)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&input)?;
        }
        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(command_failed(&args, &output));
        }
        Ok(())
    }
}

fn spawn_error(source: std::io::Error) -> VcsError {
    if source.kind() == std::io::ErrorKind::NotFound {
        VcsError::ToolMissing {
            tool: "git".to_string(),
            source,
        }
    } else {
        VcsError::Io(source)
    }
}

fn command_failed(args: &[&str], output: &Output) -> VcsError {
    VcsError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

/// Sort a failed push into the recoverable missing-upstream case or a
/// plain command failure.
pub fn classify_push_failure(command: &str, stderr: &str) -> VcsError {
    let stderr = stderr.trim().to_string();
    if NO_UPSTREAM_MARKERS.iter().any(|m| stderr.contains(m)) {
        VcsError::NoUpstream { stderr }
    } else {
        VcsError::CommandFailed {
            command: command.to_string(),
            stderr,
        }
    }
}

impl VersionControl for GitVcs {
    fn ensure_repository(&self) -> Result<PathBuf> {
        let not_a_repo = || VcsError::NotARepository {
            path: self.work_dir.clone(),
        };
        if !self.work_dir.is_dir() {
            return Err(not_a_repo());
        }
        match self.toplevel() {
            Ok(root) => Ok(root),
            Err(VcsError::CommandFailed { stderr, .. }) => {
                tracing::debug!("rev-parse refused working tree: {}", stderr);
                Err(not_a_repo())
            }
            Err(e) => Err(e),
        }
    }

    fn status(&self) -> Result<ChangeSet> {
        let args = [
            "status",
            "--porcelain=v1",
            "-z",
            "--untracked-files=all",
        ];
        let output = self.run_in(&self.work_dir, &args)?;
        if !output.status.success() {
            return Err(command_failed(&args, &output));
        }
        // Not trimmed: the leading status column may be a space.
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(ChangeSet::from_porcelain_z(&stdout))
    }

    fn stage(&self, paths: &[&str]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        tracing::info!("GitVcs: staging {} path(s)", paths.len());
        self.git_paths(&["add", "-A"], paths)
    }

    fn unstage(&self, paths: &[&str]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        if self.has_head()? {
            self.git_paths(&["reset", "-q"], paths)
        } else {
            // Unborn branch: nothing to reset to, drop the entries instead.
            self.git_paths(&["rm", "-r", "-q", "--cached", "--ignore-unmatch"], paths)
        }
    }

    fn has_staged_changes(&self) -> Result<bool> {
        let args = ["diff", "--cached", "--quiet"];
        let output = self.run_in(&self.work_dir, &args)?;
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(command_failed(&args, &output)),
        }
    }

    fn commit(&self, message: &str) -> Result<String> {
        tracing::info!("GitVcs: committing staged changes");
        self.git_cmd(&["commit", "-q", "-m", message])?;
        self.git_cmd(&["rev-parse", "--short", "HEAD"])
    }

    fn current_branch(&self) -> Result<String> {
        let args = ["symbolic-ref", "--short", "-q", "HEAD"];
        let output = self.run_in(&self.work_dir, &args)?;
        match output.status.code() {
            Some(0) => Ok(String::from_utf8_lossy(&output.stdout).trim().to_string()),
            Some(1) => Err(VcsError::DetachedHead),
            _ => Err(command_failed(&args, &output)),
        }
    }

    fn push(&self) -> Result<()> {
        tracing::info!("GitVcs: pushing current branch");
        let args = ["push"];
        let output = self.run_in(&self.work_dir, &args)?;
        if !output.status.success() {
            return Err(classify_push_failure(
                "git push",
                &String::from_utf8_lossy(&output.stderr),
            ));
        }
        Ok(())
    }

    fn push_set_upstream(&self, remote: &str, branch: &str) -> Result<()> {
        tracing::info!("GitVcs: pushing {} to {} and setting upstream", branch, remote);
        let args = ["push", "--set-upstream", remote, branch];
        let output = self.run_in(&self.work_dir, &args)?;
        if !output.status.success() {
            return Err(command_failed(&args, &output));
        }
        Ok(())
    }

    fn has_pending_push(&self, remote: &str) -> Result<bool> {
        if !self.has_head()? {
            return Ok(false);
        }
        // A detached HEAD has no branch to push.
        match self.current_branch() {
            Ok(_) => {}
            Err(VcsError::DetachedHead) => return Ok(false),
            Err(e) => return Err(e),
        }

        let upstream = self.run_in(
            &self.work_dir,
            &["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{u}"],
        )?;
        if upstream.status.success() {
            let ahead = self.git_cmd(&["rev-list", "--count", "@{u}..HEAD"])?;
            return Ok(ahead.parse::<u64>().unwrap_or(0) > 0);
        }

        // No upstream: pending only if the remote exists and lacks some of
        // the branch's commits.
        let remote_url = self.run_in(&self.work_dir, &["remote", "get-url", remote])?;
        if !remote_url.status.success() {
            return Ok(false);
        }
        let not_on_remote = format!("--remotes={}", remote);
        let ahead = self.git_cmd(&["rev-list", "--count", "HEAD", "--not", &not_on_remote])?;
        Ok(ahead.parse::<u64>().unwrap_or(0) > 0)
    }

    fn name(&self) -> &str {
        "git"
    }
}
