// runner.rs: Best-effort sanitize pass over the working tree.
//
// Nothing here can fail a publish run. A missing tool is provisioned at most
// once; if that does not help, the pass becomes a no-op with a warning. A
// failing artifact is recorded and the pass moves on to the next one.

use std::path::Path;

use serde::Serialize;

use crate::artifact::ArtifactScan;
use crate::capability::Capability;
use crate::config::SanitizeConfig;
use crate::sanitizer::Sanitizer;

/// How the sanitize pass ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum SanitizerStatus {
    /// Every discovered artifact was handed to the tool.
    Completed,
    /// Sanitizing is switched off in config or on the command line.
    Disabled,
    /// The tree holds no sanitizable artifacts; the tool was not probed.
    NoArtifacts,
    /// The pass was skipped (tool unavailable or tree unreadable).
    Skipped(String),
}

/// One artifact the tool failed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SanitizeFailure {
    pub path: String,
    pub reason: String,
}

/// What the sanitize pass did.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizeSummary {
    pub status: SanitizerStatus,
    /// Sanitizable artifacts found by the scan.
    pub discovered: usize,
    /// Artifacts the tool processed successfully.
    pub sanitized: usize,
    pub failures: Vec<SanitizeFailure>,
    /// Whether the install hook ran during this pass.
    pub provisioned: bool,
}

impl SanitizeSummary {
    fn with_status(status: SanitizerStatus) -> Self {
        Self {
            status,
            discovered: 0,
            sanitized: 0,
            failures: Vec::new(),
            provisioned: false,
        }
    }

    pub fn disabled() -> Self {
        Self::with_status(SanitizerStatus::Disabled)
    }
}

/// Runs a [`Sanitizer`] over every sanitizable artifact under a root.
pub struct ArtifactSanitizer<'a> {
    sanitizer: &'a dyn Sanitizer,
    scan: ArtifactScan,
    enabled: bool,
}

impl<'a> ArtifactSanitizer<'a> {
    pub fn new(sanitizer: &'a dyn Sanitizer, config: &SanitizeConfig) -> Self {
        Self {
            sanitizer,
            scan: ArtifactScan::from_config(config),
            enabled: config.enabled,
        }
    }

    /// Sanitize every artifact under `root` exactly once.
    pub fn run(&self, root: &Path) -> SanitizeSummary {
        if !self.enabled {
            tracing::info!("sanitize step disabled");
            return SanitizeSummary::disabled();
        }

        let artifacts = match self.scan.discover(root) {
            Ok(found) => found
                .into_iter()
                .filter(|a| a.is_sanitizable())
                .collect::<Vec<_>>(),
            Err(e) => {
                tracing::warn!("artifact scan failed, skipping sanitize: {}", e);
                return SanitizeSummary::with_status(SanitizerStatus::Skipped(e.to_string()));
            }
        };

        let mut summary = SanitizeSummary::with_status(SanitizerStatus::Completed);
        summary.discovered = artifacts.len();
        if artifacts.is_empty() {
            summary.status = SanitizerStatus::NoArtifacts;
            return summary;
        }

        let tool = match self.sanitizer.detect() {
            Capability::Available(tool) => tool,
            Capability::NotFound { program, install } => {
                let Some(hook) = install else {
                    tracing::warn!("{} not found and no install hook known; artifacts left as-is", program);
                    summary.status = SanitizerStatus::Skipped(format!("{} not found", program));
                    return summary;
                };

                tracing::warn!("{} not found, attempting install", program);
                summary.provisioned = true;
                if let Err(e) = self.sanitizer.provision(&hook) {
                    tracing::warn!("{}; artifacts left as-is", e);
                    summary.status = SanitizerStatus::Skipped(e.to_string());
                    return summary;
                }

                match self.sanitizer.detect() {
                    Capability::Available(tool) => tool,
                    Capability::NotFound { program, .. } => {
                        tracing::warn!("{} still not found after install; artifacts left as-is", program);
                        summary.status = SanitizerStatus::Skipped(format!(
                            "{} not found after running `{}`",
                            program, hook
                        ));
                        return summary;
                    }
                }
            }
        };

        for artifact in &artifacts {
            let full = root.join(&artifact.path);
            match self.sanitizer.sanitize(&tool, &full) {
                Ok(()) => summary.sanitized += 1,
                Err(e) => {
                    tracing::warn!("could not sanitize {}: {}", artifact.path.display(), e);
                    summary.failures.push(SanitizeFailure {
                        path: artifact.path.to_string_lossy().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "{} sanitized {}/{} artifact(s)",
            self.sanitizer.name(),
            summary.sanitized,
            summary.discovered
        );
        summary
    }
}
