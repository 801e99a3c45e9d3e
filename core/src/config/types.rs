use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::step::{reference_pipeline, StepDefinition};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub execution: ExecutionConfig,

    #[serde(default)]
    pub interpreter: InterpreterConfig,

    #[serde(default = "default_steps")]
    pub steps: Vec<StepDefinition>,
}

fn default_steps() -> Vec<StepDefinition> {
    reference_pipeline()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            execution: ExecutionConfig::default(),
            interpreter: InterpreterConfig::default(),
            steps: default_steps(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.execution.retry_attempts == 0 {
            return Err(ConfigError::Invalid(
                "execution.retry_attempts must be at least 1".to_string(),
            ));
        }
        if self.execution.script_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "execution.script_timeout_secs must be at least 1".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for step in &self.steps {
            if step.name.trim().is_empty() {
                return Err(ConfigError::Invalid("step with empty name".to_string()));
            }
            if !seen.insert(step.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate step name: {}",
                    step.name
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: PathBuf,

    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_archive_dir")]
    pub archive_dir: PathBuf,

    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,

    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    #[serde(default = "default_report_file")]
    pub report_file: String,
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_scripts_dir() -> PathBuf {
    PathBuf::from("r_scripts")
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_archive_dir() -> PathBuf {
    PathBuf::from("archive")
}

fn default_logs_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_config_dir() -> PathBuf {
    PathBuf::from("config")
}

fn default_report_file() -> String {
    "execution_report.json".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            scripts_dir: default_scripts_dir(),
            data_dir: default_data_dir(),
            archive_dir: default_archive_dir(),
            logs_dir: default_logs_dir(),
            config_dir: default_config_dir(),
            report_file: default_report_file(),
        }
    }
}

impl PathsConfig {
    /// Anchor every relative directory on `base_dir`.
    pub fn resolve(&self) -> ResolvedPaths {
        let base = self.base_dir.clone();
        let join = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                base.join(p)
            }
        };
        let data_dir = join(&self.data_dir);
        ResolvedPaths {
            scripts_dir: join(&self.scripts_dir),
            report_path: data_dir.join(&self.report_file),
            data_dir,
            archive_dir: join(&self.archive_dir),
            logs_dir: join(&self.logs_dir),
            config_dir: join(&self.config_dir),
            base_dir: base,
        }
    }
}

/// Absolute-or-base-relative locations used at run time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub base_dir: PathBuf,
    pub scripts_dir: PathBuf,
    pub data_dir: PathBuf,
    pub archive_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub config_dir: PathBuf,
    pub report_path: PathBuf,
}

impl ResolvedPaths {
    pub fn script_path(&self, step: &StepDefinition) -> PathBuf {
        self.scripts_dir.join(&step.name)
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    /// Directories the pipeline writes to or reads scripts from.
    pub fn working_dirs(&self) -> [&Path; 4] {
        [
            &self.data_dir,
            &self.logs_dir,
            &self.archive_dir,
            &self.scripts_dir,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default = "default_script_timeout_secs")]
    pub script_timeout_secs: u64,

    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    #[serde(default = "default_retry_cooldown_secs")]
    pub retry_cooldown_secs: u64,

    #[serde(default = "default_step_delay_secs")]
    pub step_delay_secs: u64,
}

fn default_script_timeout_secs() -> u64 {
    300
}

fn default_retry_attempts() -> u32 {
    2
}

fn default_retry_cooldown_secs() -> u64 {
    10
}

fn default_step_delay_secs() -> u64 {
    3
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            script_timeout_secs: default_script_timeout_secs(),
            retry_attempts: default_retry_attempts(),
            retry_cooldown_secs: default_retry_cooldown_secs(),
            step_delay_secs: default_step_delay_secs(),
        }
    }
}

impl ExecutionConfig {
    pub fn script_timeout(&self) -> Duration {
        Duration::from_secs(self.script_timeout_secs)
    }

    pub fn retry_cooldown(&self) -> Duration {
        Duration::from_secs(self.retry_cooldown_secs)
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_secs(self.step_delay_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpreterConfig {
    /// Explicit interpreter path; skips discovery when set.
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default = "default_interpreter_env_var")]
    pub env_var: String,

    #[serde(default = "default_verify_timeout_secs")]
    pub verify_timeout_secs: u64,
}

fn default_interpreter_env_var() -> String {
    "R_PATH".to_string()
}

fn default_verify_timeout_secs() -> u64 {
    10
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            path: None,
            env_var: default_interpreter_env_var(),
            verify_timeout_secs: default_verify_timeout_secs(),
        }
    }
}

impl InterpreterConfig {
    pub fn verify_timeout(&self) -> Duration {
        Duration::from_secs(self.verify_timeout_secs)
    }
}
