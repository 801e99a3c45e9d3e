use std::sync::Arc;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::config::ExecutionConfig;
use crate::retry::{RetryController, RetryPolicy, Sleeper};
use crate::runner::StepExecutor;
use crate::step::StepDefinition;
use crate::summary::RunSummary;

const RULE: &str = "======================================================================";

/// Runs steps strictly in order, pacing them with a fixed delay.
pub struct Pipeline {
    retry: RetryController,
    sleeper: Arc<dyn Sleeper>,
    step_delay: Duration,
}

impl Pipeline {
    pub fn new(executor: Arc<dyn StepExecutor>, sleeper: Arc<dyn Sleeper>, exec: &ExecutionConfig) -> Self {
        Self {
            retry: RetryController::new(executor, sleeper.clone(), RetryPolicy::from_config(exec)),
            sleeper,
            step_delay: exec.step_delay(),
        }
    }

    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }

    pub async fn run_all(&self, steps: &[StepDefinition]) -> RunSummary {
        let run_id = Uuid::new_v4().to_string();
        let total = steps.len();

        tracing::info!("{RULE}");
        tracing::info!(run_id = %run_id, "🚀 DATA COLLECTION - START ({total} scripts)");
        tracing::info!("{RULE}");

        let started = Instant::now();
        let mut results = Vec::with_capacity(total);

        for (i, step) in steps.iter().enumerate() {
            tracing::info!("[{}/{total}] {}", i + 1, step.name);

            let outcome = self.retry.run_with_retry(step).await;
            if !outcome.success && step.critical {
                tracing::error!(step = %step.name, "critical step failed");
            }
            results.push(outcome);

            if i + 1 < total {
                self.sleeper.sleep(self.step_delay).await;
            }
        }

        let summary = RunSummary::from_outcomes(run_id, steps, results, started.elapsed().as_secs_f64());
        log_summary(&summary);
        summary
    }
}

fn log_summary(summary: &RunSummary) {
    tracing::info!("{RULE}");
    tracing::info!("📊 SUMMARY");
    tracing::info!("{RULE}");
    tracing::info!("✅ Succeeded: {}/{}", summary.successful, summary.total_scripts);
    tracing::info!("❌ Failed: {}/{}", summary.failed, summary.total_scripts);
    tracing::info!("⏱️ Duration: {:.1}s", summary.duration);
    if !summary.critical_failed.is_empty() {
        tracing::error!("🚨 CRITICAL: {}", summary.critical_failed.join(", "));
    }
    tracing::info!("{RULE}");
}
