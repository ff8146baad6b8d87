// artifact.rs: Working-tree scan for sanitizable artifacts.
//
// The scan walks the project root, never descending into the VCS internal
// directory, local environment directories or configured ignore patterns,
// and classifies every remaining file by extension.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::SanitizeConfig;
use crate::error::SanitizeError;

/// VCS internal directories, always skipped.
const VCS_DIRS: &[&str] = &[".git", ".hg", ".svn"];

/// Whether a file gets sanitized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    SanitizableArtifact,
    OpaqueFile,
}

/// A file found by the scan, relative to the scanned root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactRef {
    pub path: PathBuf,
    pub kind: ArtifactKind,
}

impl ArtifactRef {
    pub fn is_sanitizable(&self) -> bool {
        self.kind == ArtifactKind::SanitizableArtifact
    }
}

/// Ignore patterns for the scan.
///
/// - `dirname/`: skip directories with this name at any depth
/// - `*.ext`: skip files with this suffix
/// - `name`: skip entries with exactly this name
#[derive(Debug, Clone, Default)]
pub struct IgnorePatterns {
    patterns: Vec<String>,
}

impl IgnorePatterns {
    pub fn new(patterns: impl IntoIterator<Item = String>) -> Self {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Patterns from config: environment directories plus explicit ignores.
    pub fn from_config(config: &SanitizeConfig) -> Self {
        let env_dirs = config
            .env_dirs
            .iter()
            .map(|d| format!("{}/", d.trim_end_matches('/')));
        Self::new(env_dirs.chain(config.ignore.iter().cloned()))
    }

    /// Check a single path component. `is_dir` limits `dirname/` patterns
    /// to directories.
    pub fn should_exclude(&self, name: &str, is_dir: bool) -> bool {
        if is_dir && VCS_DIRS.contains(&name) {
            return true;
        }
        self.patterns.iter().any(|pattern| {
            if let Some(dir_name) = pattern.strip_suffix('/') {
                is_dir && name == dir_name
            } else if let Some(suffix) = pattern.strip_prefix('*') {
                name.ends_with(suffix)
            } else {
                name == pattern
            }
        })
    }
}

/// Walks a tree and classifies files.
#[derive(Debug, Clone)]
pub struct ArtifactScan {
    extensions: Vec<String>,
    ignore: IgnorePatterns,
}

impl ArtifactScan {
    pub fn new(extensions: &[String], ignore: IgnorePatterns) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            ignore,
        }
    }

    pub fn from_config(config: &SanitizeConfig) -> Self {
        Self::new(&config.extensions, IgnorePatterns::from_config(config))
    }

    pub fn classify(&self, path: &Path) -> ArtifactKind {
        let matches = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .is_some_and(|ext| self.extensions.contains(&ext));
        if matches {
            ArtifactKind::SanitizableArtifact
        } else {
            ArtifactKind::OpaqueFile
        }
    }

    /// Every file under `root`, in sorted walk order.
    pub fn discover(&self, root: &Path) -> Result<Vec<ArtifactRef>, SanitizeError> {
        let mut found = Vec::new();
        self.walk(root, root, &mut found)?;
        Ok(found)
    }

    fn walk(&self, dir: &Path, root: &Path, found: &mut Vec<ArtifactRef>) -> Result<(), SanitizeError> {
        let io_err = |source| SanitizeError::IoError {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = fs::read_dir(dir)
            .map_err(io_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(io_err)?;
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let file_type = entry.file_type().map_err(io_err)?;
            // Symlinks are left alone: they may point outside the tree.
            if file_type.is_symlink() {
                continue;
            }
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if self.ignore.should_exclude(&name, file_type.is_dir()) {
                continue;
            }

            let path = entry.path();
            if file_type.is_dir() {
                self.walk(&path, root, found)?;
            } else if let Ok(rel) = path.strip_prefix(root) {
                found.push(ArtifactRef {
                    kind: self.classify(rel),
                    path: rel.to_path_buf(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "{}").unwrap();
    }

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "analysis.ipynb");
        touch(dir.path(), "notebooks/EDA.IPYNB");
        touch(dir.path(), "notebooks/.ipynb_checkpoints/EDA-checkpoint.ipynb");
        touch(dir.path(), "utils/data_prep_utils.py");
        touch(dir.path(), ".git/objects/ab/cdef");
        touch(dir.path(), ".git/stray.ipynb");
        touch(dir.path(), ".venv/lib/site-packages/pkg/demo.ipynb");
        touch(dir.path(), "data/merged.csv");
        dir
    }

    #[test]
    fn discovery_skips_vcs_env_and_checkpoints() {
        let dir = project();
        let scan = ArtifactScan::from_config(&SanitizeConfig::default());
        let found = scan.discover(dir.path()).unwrap();

        let sanitizable: Vec<PathBuf> = found
            .iter()
            .filter(|a| a.is_sanitizable())
            .map(|a| a.path.clone())
            .collect();
        assert_eq!(
            sanitizable,
            vec![
                PathBuf::from("analysis.ipynb"),
                PathBuf::from("notebooks/EDA.IPYNB"),
            ]
        );

        let opaque: Vec<PathBuf> = found
            .iter()
            .filter(|a| !a.is_sanitizable())
            .map(|a| a.path.clone())
            .collect();
        assert!(opaque.contains(&PathBuf::from("utils/data_prep_utils.py")));
        assert!(opaque.contains(&PathBuf::from("data/merged.csv")));
        assert!(found.iter().all(|a| !a.path.starts_with(".git")));
        assert!(found.iter().all(|a| !a.path.starts_with(".venv")));
    }

    #[test]
    fn custom_extensions_accept_leading_dot() {
        let scan = ArtifactScan::new(&[".Rmd".to_string()], IgnorePatterns::default());
        assert_eq!(
            scan.classify(Path::new("report.rmd")),
            ArtifactKind::SanitizableArtifact
        );
        assert_eq!(scan.classify(Path::new("report.ipynb")), ArtifactKind::OpaqueFile);
        assert_eq!(scan.classify(Path::new("Makefile")), ArtifactKind::OpaqueFile);
    }

    #[test]
    fn ignore_patterns_match_dirs_suffixes_and_names() {
        let ignore = IgnorePatterns::new(vec![
            "build/".to_string(),
            "*.tmp".to_string(),
            "scratch.ipynb".to_string(),
        ]);
        assert!(ignore.should_exclude("build", true));
        assert!(!ignore.should_exclude("build", false));
        assert!(ignore.should_exclude("x.tmp", false));
        assert!(ignore.should_exclude("scratch.ipynb", false));
        assert!(ignore.should_exclude(".git", true));
        assert!(!ignore.should_exclude("notes.ipynb", false));
    }

    #[test]
    fn missing_root_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let scan = ArtifactScan::from_config(&SanitizeConfig::default());
        let err = scan.discover(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, SanitizeError::IoError { .. }));
    }
}
