// capability.rs: Typed detection of the sanitizer tool.
//
// Probing for the tool is its own step with its own result type, so the
// runner decides what to do about a missing tool instead of discovering it
// through a failed invocation.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;

use crate::env::LocalEnv;
use crate::error::SanitizeError;

/// Result of probing for the sanitizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    /// The tool resolves to this executable.
    Available(PathBuf),

    /// The tool is missing. `install` is how to get it, when known.
    NotFound {
        program: String,
        install: Option<InstallHook>,
    },
}

/// A command that installs the sanitizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallHook {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl InstallHook {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build a hook from a full argv, as written in the config file.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program, args.to_vec()))
    }

    /// Run the hook in `work_dir`, blocking until it finishes.
    pub fn run(&self, work_dir: &Path) -> Result<(), SanitizeError> {
        tracing::info!("provisioning sanitizer: {}", self);
        let output = Command::new(&self.program)
            .args(&self.args)
            .current_dir(work_dir)
            .output()
            .map_err(|e| SanitizeError::ProvisionFailed {
                command: self.to_string(),
                detail: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(SanitizeError::ProvisionFailed {
                command: self.to_string(),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for InstallHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Resolve `program` to an executable.
///
/// Lookup order: explicit path relative to `work_dir`, the local
/// environment's executable directory, then `PATH`.
pub fn resolve_tool(program: &str, env: Option<&LocalEnv>, work_dir: &Path) -> Option<PathBuf> {
    if program.contains('/') || program.contains('\\') {
        let candidate = work_dir.join(program);
        return candidate.is_file().then_some(candidate);
    }

    if let Some(env) = env {
        if let Ok(path) = which::which_in(program, Some(env.bin_dir()), work_dir) {
            return Some(path);
        }
    }

    which::which(program).ok()
}

/// Default install hook: `<python> -m pip install <package>`, preferring the
/// local environment's interpreter so the tool lands next to the project.
pub fn default_install_hook(env: Option<&LocalEnv>, package: &str) -> Option<InstallHook> {
    let python = env
        .and_then(LocalEnv::python)
        .or_else(|| which::which("python3").ok())
        .or_else(|| which::which("python").ok())?;

    Some(InstallHook::new(
        python,
        vec![
            "-m".to_string(),
            "pip".to_string(),
            "install".to_string(),
            package.to_string(),
        ],
    ))
}
