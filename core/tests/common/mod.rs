#![allow(dead_code)]

use std::path::PathBuf;

use collector_core::api::{ExecutionConfig, PathsConfig, ResolvedPaths};
use tempfile::TempDir;

/// Throwaway project tree; scripts are shell scripts run through `/bin/sh`.
pub struct Project {
    _dir: TempDir,
    pub paths: ResolvedPaths,
}

impl Project {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = PathsConfig::default();
        cfg.base_dir = dir.path().to_path_buf();
        let paths = cfg.resolve();
        collector_core::api::ensure_directories(&paths).unwrap();
        Self { _dir: dir, paths }
    }

    pub fn script(&self, name: &str, body: &str) -> &Self {
        std::fs::write(self.paths.scripts_dir.join(name), body).unwrap();
        self
    }

    pub fn data(&self, name: &str) -> PathBuf {
        self.paths.output_path(name)
    }

    pub fn archived(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.paths.archive_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub const SHELL: &str = "/bin/sh";

/// No pacing, so tests do not sleep.
pub fn fast_execution(timeout_secs: u64) -> ExecutionConfig {
    ExecutionConfig {
        script_timeout_secs: timeout_secs,
        retry_attempts: 2,
        retry_cooldown_secs: 0,
        step_delay_secs: 0,
    }
}
