use async_trait::async_trait;

use crate::step::{StepDefinition, StepOutcome};

/// Executes a single attempt of a step. Implementations absorb every failure into the outcome.
#[async_trait]
pub trait StepExecutor: Send + Sync {
    async fn run(&self, step: &StepDefinition, attempt: u32) -> StepOutcome;
}
