//! Error types for the collaborator adapters.
//!
//! The classification and synchronization core is total and never returns
//! these; only model, host and configuration calls do.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to contact model server: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model server error: {status}")]
    Server { status: reqwest::StatusCode },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported language for execution: {0}")]
    UnsupportedLanguage(String),

    #[error("path is not a directory: {0}")]
    NotADirectory(String),

    #[error("directory does not exist: {0}")]
    DirectoryNotFound(String),

    #[error("project directory already exists: {0}")]
    ProjectExists(String),

    #[error("invalid project name: {0:?}")]
    InvalidProjectName(String),

    #[error("{program} failed: {stderr}")]
    Command { program: String, stderr: String },

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
