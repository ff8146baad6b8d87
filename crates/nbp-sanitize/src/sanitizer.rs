//! Sanitizer trait and the command-line backend

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::capability::{default_install_hook, resolve_tool, Capability, InstallHook};
use crate::config::SanitizeConfig;
use crate::env::LocalEnv;
use crate::error::SanitizeError;

/// The artifact-sanitizing capability.
///
/// Implementations rewrite one artifact in place, idempotently: running
/// `sanitize` on an already-clean artifact must leave its bytes unchanged.
pub trait Sanitizer: Send + Sync {
    /// Probe for the tool without running it on anything.
    fn detect(&self) -> Capability;

    /// Install the tool using the hook returned by [`Sanitizer::detect`].
    fn provision(&self, hook: &InstallHook) -> Result<(), SanitizeError>;

    /// Rewrite `artifact` in place using the executable found by `detect`.
    fn sanitize(&self, tool: &Path, artifact: &Path) -> Result<(), SanitizeError>;

    /// Sanitizer display name (for logs and reports).
    fn name(&self) -> &str;
}

/// Runs an external program (`nbstripout` by default) once per artifact.
pub struct CommandSanitizer {
    program: String,
    args: Vec<String>,
    work_dir: PathBuf,
    env: Option<LocalEnv>,
    install: Option<InstallHook>,
}

impl CommandSanitizer {
    /// Build the sanitizer for `work_dir`, resolving the local environment
    /// and install hook up front.
    pub fn new(work_dir: impl Into<PathBuf>, config: &SanitizeConfig) -> Self {
        let work_dir = work_dir.into();
        let env = LocalEnv::discover(&work_dir, &config.env_dirs);

        let install = if !config.auto_install {
            None
        } else if let Some(argv) = &config.install_command {
            InstallHook::from_argv(argv)
        } else {
            default_install_hook(env.as_ref(), &config.install_package)
        };

        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            work_dir,
            env,
            install,
        }
    }

    pub fn local_env(&self) -> Option<&LocalEnv> {
        self.env.as_ref()
    }
}

impl Sanitizer for CommandSanitizer {
    fn detect(&self) -> Capability {
        match resolve_tool(&self.program, self.env.as_ref(), &self.work_dir) {
            Some(path) => {
                tracing::debug!("sanitizer resolved to {}", path.display());
                Capability::Available(path)
            }
            None => Capability::NotFound {
                program: self.program.clone(),
                install: self.install.clone(),
            },
        }
    }

    fn provision(&self, hook: &InstallHook) -> Result<(), SanitizeError> {
        hook.run(&self.work_dir)
    }

    fn sanitize(&self, tool: &Path, artifact: &Path) -> Result<(), SanitizeError> {
        let output = Command::new(tool)
            .args(&self.args)
            .arg(artifact)
            .current_dir(&self.work_dir)
            .output()
            .map_err(|source| SanitizeError::SpawnFailed {
                tool: tool.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(SanitizeError::ToolFailed {
                tool: self.program.clone(),
                path: artifact.to_path_buf(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.program
    }
}
