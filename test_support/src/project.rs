//! Temporary project directories for binary tests.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// A temporary directory holding a rules file and optionally a timestamps
/// file. The directory is removed when the value is dropped.
#[derive(Debug)]
pub struct TempProject {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl TempProject {
    /// Create an empty project directory.
    ///
    /// # Errors
    ///
    /// Fails if the directory cannot be created or its path is not UTF-8.
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp project")?;
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|p| anyhow::anyhow!("temp dir {} is not UTF-8", p.display()))?;
        Ok(Self { _dir: dir, root })
    }

    /// Create a project with `rules.yml` and `timestamps.yml` populated.
    ///
    /// # Errors
    ///
    /// Fails if either file cannot be written.
    pub fn with_files(rules: &str, timestamps: &str) -> Result<Self> {
        let project = Self::new()?;
        project.write("rules.yml", rules)?;
        project.write("timestamps.yml", timestamps)?;
        Ok(project)
    }

    /// Root directory of the project.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Write `contents` to `name` under the root, creating parent
    /// directories as needed.
    ///
    /// # Errors
    ///
    /// Fails if the file or a parent directory cannot be written.
    pub fn write(&self, name: &str, contents: &str) -> Result<Utf8PathBuf> {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {path}"))?;
        Ok(path)
    }
}
