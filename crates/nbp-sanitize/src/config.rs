//! Sanitizer configuration (`[sanitize]` table of `.nbp/publish.toml`).

use serde::{Deserialize, Serialize};

/// Sanitizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanitizeConfig {
    /// Run the sanitize step at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Sanitizer executable name or project-relative path.
    #[serde(default = "default_program")]
    pub program: String,

    /// Extra arguments placed before the artifact path.
    #[serde(default)]
    pub args: Vec<String>,

    /// File extensions (without the dot) treated as sanitizable artifacts.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Candidate project-local environment directories, first match wins.
    /// They are also never scanned for artifacts.
    #[serde(default = "default_env_dirs")]
    pub env_dirs: Vec<String>,

    /// Extra ignore patterns: `dir/`, `*.ext` or an exact file name.
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,

    /// Try to install the sanitizer once when it cannot be found.
    #[serde(default = "default_true")]
    pub auto_install: bool,

    /// Package installed by the default install hook.
    #[serde(default = "default_install_package")]
    pub install_package: String,

    /// Full install command overriding the default `python -m pip install`.
    #[serde(default)]
    pub install_command: Option<Vec<String>>,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: default_program(),
            args: Vec::new(),
            extensions: default_extensions(),
            env_dirs: default_env_dirs(),
            ignore: default_ignore(),
            auto_install: true,
            install_package: default_install_package(),
            install_command: None,
        }
    }
}

// Serde default functions
fn default_true() -> bool {
    true
}

fn default_program() -> String {
    "nbstripout".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["ipynb".to_string()]
}

fn default_env_dirs() -> Vec<String> {
    [".venv", "venv", "env"].iter().map(|s| s.to_string()).collect()
}

fn default_ignore() -> Vec<String> {
    vec![".ipynb_checkpoints/".to_string()]
}

fn default_install_package() -> String {
    "nbstripout".to_string()
}
