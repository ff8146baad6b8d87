//! Publish configuration loaded from `.nbp/publish.toml`

use std::path::{Path, PathBuf};

use nbp_sanitize::SanitizeConfig;
use nbp_vcs::GitConfig;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Top-level publish configuration. Every field has a default, so an empty
/// or missing file yields a working setup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Version-control backend configuration
    #[serde(default)]
    pub git: GitConfig,

    /// Sanitize step configuration
    #[serde(default)]
    pub sanitize: SanitizeConfig,
}

impl PublishConfig {
    /// Config location relative to the project root.
    pub const RELATIVE_PATH: &'static str = ".nbp/publish.toml";

    pub fn path_for(project_root: &Path) -> PathBuf {
        project_root.join(Self::RELATIVE_PATH)
    }

    /// Load config from `path`.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path).map_err(|e| PipelineError::Config {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| PipelineError::Config {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }

    /// Load config, returning defaults if the file doesn't exist. A file
    /// that exists but does not parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, PipelineError> {
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }
}
