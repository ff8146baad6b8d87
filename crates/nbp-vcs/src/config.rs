//! Git backend configuration (`[git]` table of `.nbp/publish.toml`).

use serde::{Deserialize, Serialize};

/// Git backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    /// Remote used when an upstream has to be established.
    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}
