// env.rs: Project-local environment resolution.
//
// Instead of activating an environment in the parent shell, the publish run
// resolves the environment's executable directory once and hands it to the
// sanitizer as an explicit search path. Nothing in the process environment
// is mutated.

use std::path::{Path, PathBuf};

/// Executable directory inside a virtual environment.
#[cfg(windows)]
const BIN_DIR: &str = "Scripts";
#[cfg(not(windows))]
const BIN_DIR: &str = "bin";

#[cfg(windows)]
const PYTHON_EXE: &str = "python.exe";
#[cfg(not(windows))]
const PYTHON_EXE: &str = "python";

/// A project-local environment directory (e.g. `.venv/`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalEnv {
    root: PathBuf,
}

impl LocalEnv {
    /// Find the first candidate under `project_root` that looks like an
    /// environment, i.e. has an executable directory. Absence is not an error.
    pub fn discover(project_root: &Path, candidates: &[String]) -> Option<Self> {
        candidates
            .iter()
            .map(|name| project_root.join(name))
            .find(|dir| dir.join(BIN_DIR).is_dir())
            .map(|root| {
                tracing::debug!("using local environment at {}", root.display());
                Self { root }
            })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory searched first when resolving the sanitizer.
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join(BIN_DIR)
    }

    /// The environment's interpreter, if it has one.
    pub fn python(&self) -> Option<PathBuf> {
        let python = self.bin_dir().join(PYTHON_EXE);
        python.is_file().then_some(python)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn candidates() -> Vec<String> {
        vec![".venv".to_string(), "venv".to_string()]
    }

    #[test]
    fn missing_environment_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(LocalEnv::discover(dir.path(), &candidates()).is_none());
    }

    #[test]
    fn directory_without_bin_is_ignored() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".venv")).unwrap();
        assert!(LocalEnv::discover(dir.path(), &candidates()).is_none());
    }

    #[test]
    fn first_candidate_with_bin_wins() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("venv").join(BIN_DIR)).unwrap();
        std::fs::create_dir_all(dir.path().join(".venv")).unwrap();

        let env = LocalEnv::discover(dir.path(), &candidates()).unwrap();
        assert_eq!(env.root(), dir.path().join("venv"));
        assert_eq!(env.bin_dir(), dir.path().join("venv").join(BIN_DIR));
        assert!(env.python().is_none());
    }
}
