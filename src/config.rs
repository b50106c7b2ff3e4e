//! Configuration loading.
//!
//! Resolution order:
//! 1. Explicit path (`--config` or `PSEUDOBENCH_CONFIG`)
//! 2. `<config dir>/pseudobench/config.toml`
//! 3. Built-in defaults

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const TESTING_GROUNDS_DIR: &str = "Pseudobench_Testing_Grounds";
const PROJECTS_DIR: &str = "projects";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkbenchConfig {
    pub inference: InferenceConfig,
    pub workspace: WorkspaceConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Base URL of the llama.cpp server.
    pub server_url: String,
    pub n_predict: u32,
    pub chat_temperature: f32,
    pub transcribe_temperature: f32,
    pub timeout_secs: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".to_string(),
            n_predict: 512,
            chat_temperature: 0.7,
            transcribe_temperature: 0.2,
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    pub root: Option<PathBuf>,
    /// Where New Project creates directories; defaults to `<root>/projects`.
    pub projects: Option<PathBuf>,
}

impl WorkspaceConfig {
    pub fn resolve_root(&self) -> PathBuf {
        match &self.root {
            Some(root) => root.clone(),
            None => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(TESTING_GROUNDS_DIR),
        }
    }

    pub fn resolve_projects(&self) -> PathBuf {
        self.projects
            .clone()
            .unwrap_or_else(|| self.resolve_root().join(PROJECTS_DIR))
    }
}

pub fn parse(text: &str) -> Result<WorkbenchConfig> {
    Ok(toml::from_str(text)?)
}

pub fn load(explicit: Option<&Path>) -> Result<WorkbenchConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        return read(path);
    }

    match user_config_path() {
        Some(path) if path.exists() => read(&path),
        _ => {
            debug!("no config file found, using defaults");
            Ok(WorkbenchConfig::default())
        }
    }
}

fn read(path: &Path) -> Result<WorkbenchConfig> {
    info!("loading config from {}", path.display());
    let text = std::fs::read_to_string(path)?;
    parse(&text)
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pseudobench").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::{load, parse};
    use crate::error::Error;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse("").expect("empty config should parse");
        assert_eq!(config.inference.server_url, "http://127.0.0.1:8080");
        assert_eq!(config.inference.n_predict, 512);
        assert!(config.workspace.root.is_none());
        assert!(config
            .workspace
            .resolve_root()
            .ends_with("Pseudobench_Testing_Grounds"));
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = parse(
            r#"
[inference]
server_url = "http://10.0.0.5:9000"
chat_temperature = 0.3

[workspace]
root = "/tmp/bench"
"#,
        )
        .expect("partial config should parse");
        assert_eq!(config.inference.server_url, "http://10.0.0.5:9000");
        assert!((config.inference.chat_temperature - 0.3).abs() < f32::EPSILON);
        assert!((config.inference.transcribe_temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.workspace.resolve_root(), PathBuf::from("/tmp/bench"));
        assert_eq!(
            config.workspace.resolve_projects(),
            PathBuf::from("/tmp/bench/projects")
        );
    }

    #[test]
    fn projects_dir_can_be_set_separately() {
        let config = parse("[workspace]\nprojects = \"/srv/projects\"").expect("config should parse");
        assert_eq!(config.workspace.resolve_projects(), PathBuf::from("/srv/projects"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let error = parse("[inference\nserver_url = 1").expect_err("broken toml should fail");
        assert!(matches!(error, Error::Toml(_)));
    }

    #[test]
    fn explicit_path_is_read() {
        let mut file = tempfile::NamedTempFile::new().expect("temp config should be created");
        writeln!(file, "[inference]\nn_predict = 64").expect("temp config should be written");
        let config = load(Some(file.path())).expect("explicit config should load");
        assert_eq!(config.inference.n_predict, 64);
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let error = load(Some(&dir.path().join("absent.toml"))).expect_err("missing file");
        assert!(matches!(error, Error::Config(_)));
    }
}
