use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;

use crate::archive::{ArchiveStatus, Archiver};
use crate::config::{ExecutionConfig, ResolvedPaths};
use crate::retry::RetryPolicy;
use crate::step::{OutputStatus, StepDefinition, StepError, StepOutcome};
use crate::verify::verify_output;

use super::process::{run_process, ProcessError, ProcessSpec};
use super::traits::StepExecutor;

/// Runs `<interpreter> <script>` for one step and turns the result into a [`StepOutcome`].
#[derive(Debug, Clone)]
pub struct StepRunner {
    interpreter: PathBuf,
    paths: ResolvedPaths,
    archiver: Archiver,
    timeout: Duration,
    max_attempts: u32,
}

impl StepRunner {
    pub fn new(interpreter: impl Into<PathBuf>, paths: ResolvedPaths, exec: &ExecutionConfig) -> Self {
        let archiver = Archiver::new(paths.archive_dir.clone());
        Self {
            interpreter: interpreter.into(),
            paths,
            archiver,
            timeout: exec.script_timeout(),
            max_attempts: RetryPolicy::from_config(exec).max_attempts,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Attempt ceiling shown in progress lines; agrees with [`RetryPolicy`].
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    async fn archive_outputs(&self, step: &StepDefinition) {
        for file in &step.output_files {
            match self.archiver.archive(&self.paths.output_path(file)).await {
                ArchiveStatus::Archived(dest) => {
                    tracing::debug!(file = %file, archived_to = %dest.display(), "archived previous output");
                }
                ArchiveStatus::NothingToArchive => {}
                ArchiveStatus::Failed(reason) => {
                    tracing::warn!(file = %file, reason = %reason, "could not archive previous output");
                }
            }
        }
    }

    async fn verify_outputs(&self, step: &StepDefinition) -> IndexMap<String, OutputStatus> {
        let mut statuses = IndexMap::new();
        for file in &step.output_files {
            let status = verify_output(&self.paths.output_path(file)).await;
            if status.valid {
                tracing::info!("   ✅ {file}: {} records", status.records);
            } else {
                tracing::error!(
                    "   ❌ {file}: {}",
                    status.error.as_deref().unwrap_or("invalid")
                );
            }
            statuses.insert(file.clone(), status);
        }
        statuses
    }
}

#[async_trait]
impl StepExecutor for StepRunner {
    async fn run(&self, step: &StepDefinition, attempt: u32) -> StepOutcome {
        let script = self.paths.script_path(step);
        if !script.is_file() {
            tracing::error!(script = %script.display(), "❌ script not found");
            return StepOutcome::failed(&step.name, attempt, StepError::MissingScript);
        }
        // The child runs with cwd = base_dir, so hand it a path that does not depend on ours.
        let script = tokio::fs::canonicalize(&script).await.unwrap_or(script);

        self.archive_outputs(step).await;

        tracing::info!("▶ [{attempt}/{}] {}", self.max_attempts, step.label());

        let spec = ProcessSpec {
            program: self.interpreter.clone(),
            args: vec![script.display().to_string()],
            cwd: Some(self.paths.base_dir.clone()),
            timeout: self.timeout,
        };

        let output = match run_process(&spec).await {
            Ok(output) => output,
            Err(ProcessError::Timeout { elapsed }) => {
                tracing::error!(step = %step.name, timeout_secs = self.timeout.as_secs(), "⏱️ timeout");
                return StepOutcome::failed(&step.name, attempt, StepError::Timeout)
                    .with_duration(elapsed.as_secs_f64());
            }
            Err(e) => {
                tracing::error!(step = %step.name, error = %e, "❌ failed to run script");
                return StepOutcome::failed(&step.name, attempt, StepError::Launch(e.to_string()));
            }
        };

        let duration = output.duration.as_secs_f64();

        for line in output.stdout.lines().filter(|l| !l.trim().is_empty()) {
            tracing::info!(target: "collector.script", "   R: {line}");
        }

        if output.exit_code != 0 {
            let stderr = output.stderr.trim();
            if !stderr.is_empty() {
                tracing::error!(target: "collector.script", "   R stderr: {stderr}");
            }
            tracing::error!(step = %step.name, exit_code = output.exit_code, "❌ script failed");
            return StepOutcome::exited(&step.name, attempt, output.exit_code, duration);
        }

        let statuses = self.verify_outputs(step).await;
        let outcome = StepOutcome::exited(&step.name, attempt, 0, duration).with_outputs(statuses);

        if outcome.success {
            tracing::info!("✅ {} - success ({duration:.1}s)", step.name);
        } else {
            tracing::warn!("⚠️ {} - finished with invalid output", step.name);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathsConfig;

    #[tokio::test]
    async fn missing_script_does_not_launch_or_archive() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = PathsConfig::default();
        paths.base_dir = dir.path().to_path_buf();
        let paths = paths.resolve();

        std::fs::create_dir_all(&paths.data_dir).unwrap();
        std::fs::write(paths.output_path("a.json"), "[]").unwrap();

        // An interpreter that does not exist proves no spawn was attempted.
        let runner = StepRunner::new("/no/such/interpreter", paths.clone(), &ExecutionConfig::default());
        let step = StepDefinition::new("absent.R", "absent").with_outputs(["a.json"]);

        let outcome = runner.run(&step, 1).await;
        assert!(!outcome.success);
        assert_eq!(outcome.error, Some(StepError::MissingScript));
        assert_eq!(outcome.exit_code, None);
        assert!(!paths.archive_dir.exists());
    }

    #[test]
    fn attempt_ceiling_matches_retry_policy() {
        let exec = ExecutionConfig {
            retry_attempts: 0,
            ..Default::default()
        };
        let runner = StepRunner::new("/bin/sh", PathsConfig::default().resolve(), &exec);
        assert_eq!(runner.max_attempts(), 1);
        assert_eq!(runner.max_attempts(), RetryPolicy::from_config(&exec).max_attempts);
    }

    #[tokio::test]
    async fn launch_failure_becomes_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = PathsConfig::default();
        paths.base_dir = dir.path().to_path_buf();
        let paths = paths.resolve();
        std::fs::create_dir_all(&paths.scripts_dir).unwrap();
        std::fs::write(paths.scripts_dir.join("s.R"), "cat('hi')").unwrap();

        let runner = StepRunner::new("/no/such/interpreter", paths, &ExecutionConfig::default());
        let outcome = runner.run(&StepDefinition::new("s.R", ""), 2).await;

        assert!(!outcome.success);
        assert_eq!(outcome.attempt, 2);
        assert_eq!(outcome.exit_code, None);
        assert!(matches!(outcome.error, Some(StepError::Launch(_))));
    }
}
