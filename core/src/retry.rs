//! Bounded retry of a single step.
//!
//! The controller walks an explicit state sequence:
//!
//! ```text
//! Pending -> Attempting(n) -> Succeeded
//!                          -> AwaitingRetry { next_attempt, cooldown } -> Attempting(n + 1)
//!                          -> Exhausted
//! ```
//!
//! Only critical steps are retried. Only the last attempt's outcome is returned;
//! earlier failures are logged.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::ExecutionConfig;
use crate::runner::StepExecutor;
use crate::step::{StepDefinition, StepOutcome};

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub cooldown: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ExecutionConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(cfg: &ExecutionConfig) -> Self {
        Self {
            max_attempts: cfg.retry_attempts.max(1),
            cooldown: cfg.retry_cooldown(),
        }
    }

    /// State that follows a finished attempt.
    pub fn transition(&self, step: &StepDefinition, outcome: StepOutcome) -> RetryState {
        if outcome.success {
            return RetryState::Succeeded(outcome);
        }
        if step.critical && outcome.attempt < self.max_attempts {
            return RetryState::AwaitingRetry {
                next_attempt: outcome.attempt + 1,
                cooldown: self.cooldown,
                failed: outcome,
            };
        }
        RetryState::Exhausted(outcome)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RetryState {
    Pending,
    Attempting(u32),
    Succeeded(StepOutcome),
    AwaitingRetry {
        next_attempt: u32,
        cooldown: Duration,
        failed: StepOutcome,
    },
    Exhausted(StepOutcome),
}

#[derive(Clone)]
pub struct RetryController {
    executor: Arc<dyn StepExecutor>,
    sleeper: Arc<dyn Sleeper>,
    policy: RetryPolicy,
}

impl RetryController {
    pub fn new(executor: Arc<dyn StepExecutor>, sleeper: Arc<dyn Sleeper>, policy: RetryPolicy) -> Self {
        Self {
            executor,
            sleeper,
            policy,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub async fn run_with_retry(&self, step: &StepDefinition) -> StepOutcome {
        let mut state = RetryState::Pending;
        loop {
            state = match state {
                RetryState::Pending => RetryState::Attempting(1),
                RetryState::Attempting(attempt) => {
                    let outcome = self.executor.run(step, attempt).await;
                    self.policy.transition(step, outcome)
                }
                RetryState::AwaitingRetry {
                    next_attempt,
                    cooldown,
                    failed,
                } => {
                    tracing::warn!(
                        step = %step.name,
                        attempt = failed.attempt,
                        error = ?failed.error,
                        exit_code = ?failed.exit_code,
                        "⚠️ retrying in {}s",
                        cooldown.as_secs()
                    );
                    self.sleeper.sleep(cooldown).await;
                    RetryState::Attempting(next_attempt)
                }
                RetryState::Succeeded(outcome) => return outcome,
                RetryState::Exhausted(outcome) => {
                    tracing::debug!(step = %step.name, attempts = outcome.attempt, "giving up");
                    return outcome;
                }
            };
        }
    }
}
