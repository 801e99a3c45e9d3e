use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: String, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to prepare env file {path}")]
    EnvFileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load env file {path}")]
    EnvFileLoad {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// Conditions detected before the first step runs. All of them are fatal.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("interpreter not found (tried: {tried})")]
    InterpreterNotFound { tried: String },

    #[error("interpreter {path} is not usable: {reason}")]
    InterpreterUnusable { path: String, reason: String },

    #[error("{} script(s) missing: {}", .0.len(), .0.join(", "))]
    MissingScripts(Vec<String>),

    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to serialize execution report")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write execution report to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
