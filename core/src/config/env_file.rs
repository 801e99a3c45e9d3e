use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const ENV_FILE_NAME: &str = ".env";

const DEFAULT_ENV: &str = "# Ekstraklasa data collector
# Uncomment to pin the interpreter instead of relying on discovery.
# R_PATH=/usr/bin/Rscript

SEASON_START=2025
SEASON_END=2026
LEAGUE_COUNTRY=Poland
LEAGUE_URL=https://www.transfermarkt.com/ekstraklasa/startseite/wettbewerb/PL1
REQUEST_DELAY=3
MAX_RETRIES=2
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFileStatus {
    Loaded(PathBuf),
    /// No env file existed; a default one was written and then loaded.
    Created(PathBuf),
}

/// Load `<config_dir>/.env` into the process environment, bootstrapping a default file first
/// when none exists. Variables already present in the environment win.
pub fn load_env_file(config_dir: &Path) -> Result<EnvFileStatus, ConfigError> {
    let path = config_dir.join(ENV_FILE_NAME);
    let created = if path.exists() {
        false
    } else {
        write_default_env(&path)?;
        true
    };

    dotenvy::from_path(&path).map_err(|source| ConfigError::EnvFileLoad {
        path: path.clone(),
        source,
    })?;

    Ok(if created {
        EnvFileStatus::Created(path)
    } else {
        EnvFileStatus::Loaded(path)
    })
}

fn write_default_env(path: &Path) -> Result<(), ConfigError> {
    let write_err = |source| ConfigError::EnvFileWrite {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, DEFAULT_ENV).map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstraps_default_env_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join("config");

        let status = load_env_file(&config_dir).unwrap();
        let path = config_dir.join(ENV_FILE_NAME);
        assert_eq!(status, EnvFileStatus::Created(path.clone()));

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("SEASON_START=2025"));
        assert!(written.contains("# R_PATH="));
    }

    #[test]
    fn loads_existing_env_file_into_process_env() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(ENV_FILE_NAME),
            "COLLECTOR_ENV_FILE_TEST_KEY=loaded\n",
        )
        .unwrap();

        let status = load_env_file(dir.path()).unwrap();
        assert!(matches!(status, EnvFileStatus::Loaded(_)));
        assert_eq!(
            std::env::var("COLLECTOR_ENV_FILE_TEST_KEY").as_deref(),
            Ok("loaded")
        );
    }
}
