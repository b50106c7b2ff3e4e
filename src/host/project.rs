use super::fs::write_atomic;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::info;

const README_FILE: &str = "README.md";

/// What the New Project form collects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSpec {
    pub name: String,
    pub description: String,
    pub intent: String,
    pub requirements: String,
}

impl ProjectSpec {
    pub fn readme(&self) -> String {
        format!(
            "# {}\n\n{}\n\n## Intent\n{}\n\n## Requirements\n{}",
            self.name.trim(),
            self.description,
            self.intent,
            self.requirements
        )
    }

    /// The directory name, or an error when it would escape `base`.
    fn dir_name(&self) -> Result<&str> {
        let name = self.name.trim();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(Error::InvalidProjectName(self.name.clone()));
        }
        Ok(name)
    }
}

/// Creates `base/<name>`, initializes a git repository in it and writes the
/// README. Refuses to touch an existing directory.
pub(crate) async fn init(base: &Path, spec: &ProjectSpec) -> Result<PathBuf> {
    let path = base.join(spec.dir_name()?);
    if tokio::fs::try_exists(&path).await? {
        return Err(Error::ProjectExists(path.display().to_string()));
    }
    tokio::fs::create_dir_all(&path).await?;

    let output = Command::new("git")
        .arg("init")
        .current_dir(&path)
        .output()
        .await
        .map_err(|source| Error::Spawn {
            program: "git".to_string(),
            source,
        })?;
    if !output.status.success() {
        return Err(Error::Command {
            program: "git init".to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    write_atomic(&path.join(README_FILE), &spec.readme()).await?;
    info!("project initialized at {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::{init, ProjectSpec};
    use crate::error::Error;

    fn spec(name: &str) -> ProjectSpec {
        ProjectSpec {
            name: name.to_string(),
            description: "Sorting playground".to_string(),
            intent: "Learn merge sort".to_string(),
            requirements: "- stable\n- O(n log n)".to_string(),
        }
    }

    fn git_available() -> bool {
        std::process::Command::new("git")
            .arg("--version")
            .output()
            .is_ok_and(|output| output.status.success())
    }

    #[test]
    fn readme_lists_every_section() {
        assert_eq!(
            spec(" sorter ").readme(),
            "# sorter\n\nSorting playground\n\n## Intent\nLearn merge sort\n\n## Requirements\n- stable\n- O(n log n)"
        );
    }

    #[tokio::test]
    async fn names_that_escape_the_base_are_rejected() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        for name in ["", "  ", "..", "a/b", "a\\b"] {
            let error = init(dir.path(), &spec(name)).await.expect_err("name should be rejected");
            assert!(matches!(error, Error::InvalidProjectName(_)), "{name:?}");
        }
    }

    #[tokio::test]
    async fn existing_directory_is_left_alone() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        std::fs::create_dir(dir.path().join("sorter")).expect("fixture dir should be created");

        let error = init(dir.path(), &spec("sorter")).await.expect_err("should refuse");
        assert!(matches!(error, Error::ProjectExists(_)));
        assert!(!dir.path().join("sorter").join("README.md").exists());
    }

    #[tokio::test]
    async fn init_creates_repository_and_readme() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().expect("temp dir should be created");

        let path = init(&dir.path().join("projects"), &spec("sorter"))
            .await
            .expect("project should be created");
        assert_eq!(path, dir.path().join("projects").join("sorter"));
        assert!(path.join(".git").is_dir());
        let readme = std::fs::read_to_string(path.join("README.md")).expect("readme should exist");
        assert!(readme.starts_with("# sorter\n"));
    }
}
