//! The host process: files, toolchains and the terminal.

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::info;

mod exec;
mod fs;
mod project;

pub use project::ProjectSpec;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

#[async_trait]
pub trait Host: Send + Sync {
    fn working_directory(&self) -> PathBuf;

    /// Creates `root` if needed and makes it the working directory.
    async fn ensure_workspace(&self, root: &Path) -> Result<PathBuf>;

    async fn read_file(&self, path: &Path) -> Result<String>;

    /// Relative paths resolve against the working directory.
    async fn write_file(&self, path: &Path, content: &str) -> Result<()>;

    /// Lists `path`, or the working directory when `None`. Directories first.
    async fn list_directory(&self, path: Option<&Path>) -> Result<Vec<FileEntry>>;

    /// Writes `code` to `main.<ext>` in the working directory and runs it,
    /// returning the combined stdout/stderr transcript.
    async fn execute(&self, language: &str, code: &str) -> Result<String>;

    async fn run_command(&self, command: &str) -> Result<String>;

    /// Creates `base/<name>` as a fresh git repository with a README and
    /// returns its path. The working directory is left as it was.
    async fn init_project(&self, base: &Path, project: &ProjectSpec) -> Result<PathBuf>;

    /// Switches to an existing directory, relative paths resolving against
    /// the current one.
    async fn change_working_directory(&self, path: &Path) -> Result<PathBuf>;
}

/// Runs everything on the local machine relative to a mutable working
/// directory.
pub struct LocalHost {
    cwd: Mutex<PathBuf>,
}

impl LocalHost {
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd: Mutex::new(cwd),
        }
    }

    fn set_working_directory(&self, path: PathBuf) {
        let mut cwd = self.cwd.lock().unwrap_or_else(PoisonError::into_inner);
        *cwd = path;
    }
}

#[async_trait]
impl Host for LocalHost {
    fn working_directory(&self) -> PathBuf {
        self.cwd
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn ensure_workspace(&self, root: &Path) -> Result<PathBuf> {
        tokio::fs::create_dir_all(root).await?;
        let root = tokio::fs::canonicalize(root).await?;
        info!("workspace ready at {}", root.display());
        self.set_working_directory(root.clone());
        Ok(root)
    }

    async fn read_file(&self, path: &Path) -> Result<String> {
        let path = fs::resolve(&self.working_directory(), path);
        Ok(tokio::fs::read_to_string(path).await?)
    }

    async fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        let path = fs::resolve(&self.working_directory(), path);
        fs::write_atomic(&path, content).await?;
        Ok(())
    }

    async fn list_directory(&self, path: Option<&Path>) -> Result<Vec<FileEntry>> {
        let cwd = self.working_directory();
        let target = path.map_or_else(|| cwd.clone(), |path| fs::resolve(&cwd, path));
        fs::list_directory(&target).await
    }

    async fn execute(&self, language: &str, code: &str) -> Result<String> {
        exec::execute(&self.working_directory(), language, code).await
    }

    async fn run_command(&self, command: &str) -> Result<String> {
        let cwd = self.working_directory();
        let Some(target) = exec::cd_target(command) else {
            return exec::run_shell(&cwd, command).await;
        };

        let destination = match target {
            "" | "~" => dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")),
            other => cwd.join(other),
        };
        match tokio::fs::canonicalize(&destination).await {
            Ok(path) if path.is_dir() => {
                self.set_working_directory(path);
                Ok(String::new())
            }
            Ok(path) => Ok(format!("cd: {target}: not a directory: {}", path.display())),
            Err(err) => Ok(format!("cd: {target}: {err}")),
        }
    }

    async fn init_project(&self, base: &Path, project: &ProjectSpec) -> Result<PathBuf> {
        let base = fs::resolve(&self.working_directory(), base);
        project::init(&base, project).await
    }

    async fn change_working_directory(&self, path: &Path) -> Result<PathBuf> {
        let target = fs::resolve(&self.working_directory(), path);
        let metadata = match tokio::fs::metadata(&target).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::DirectoryNotFound(target.display().to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        if !metadata.is_dir() {
            return Err(Error::NotADirectory(target.display().to_string()));
        }

        let target = tokio::fs::canonicalize(&target).await?;
        info!("working directory is now {}", target.display());
        self.set_working_directory(target.clone());
        Ok(target)
    }
}
