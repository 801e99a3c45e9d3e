use chrono::{Local, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::step::{StepDefinition, StepOutcome};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_INTERRUPTED: i32 = 130;

/// Aggregate record of one pipeline run; persisted as the execution report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub total_scripts: usize,
    pub successful: usize,
    pub failed: usize,
    pub critical_failed: Vec<String>,
    /// Seconds.
    pub duration: f64,
    pub results: Vec<StepOutcome>,
    /// ISO-8601, local time with offset.
    pub timestamp: String,
}

impl RunSummary {
    /// Fold final outcomes (one per step, same order as `steps`) into a summary.
    pub fn from_outcomes(
        run_id: impl Into<String>,
        steps: &[StepDefinition],
        results: Vec<StepOutcome>,
        duration: f64,
    ) -> Self {
        let successful = results.iter().filter(|r| r.success).count();
        let critical_failed = steps
            .iter()
            .zip(&results)
            .filter(|(step, outcome)| step.critical && !outcome.success)
            .map(|(step, _)| step.name.clone())
            .collect();

        Self {
            run_id: run_id.into(),
            total_scripts: steps.len(),
            successful,
            failed: results.len() - successful,
            critical_failed,
            duration,
            results,
            timestamp: Local::now().to_rfc3339_opts(SecondsFormat::Micros, false),
        }
    }

    pub fn status(&self) -> RunStatus {
        if !self.critical_failed.is_empty() {
            RunStatus::CriticalFailure
        } else if self.failed > 0 {
            RunStatus::PartialSuccess
        } else {
            RunStatus::Success
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    /// Only non-critical steps failed.
    PartialSuccess,
    CriticalFailure,
    Interrupted,
}

impl RunStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Success | RunStatus::PartialSuccess => EXIT_SUCCESS,
            RunStatus::CriticalFailure => EXIT_FAILURE,
            RunStatus::Interrupted => EXIT_INTERRUPTED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(name: &str, ok: bool) -> StepOutcome {
        let o = StepOutcome::exited(name, 1, if ok { 0 } else { 1 }, 0.5);
        if ok {
            o.with_outputs(Default::default())
        } else {
            o
        }
    }

    #[test]
    fn counts_and_critical_failures() {
        let steps = vec![
            StepDefinition::new("a", "").critical(true),
            StepDefinition::new("b", "").critical(false),
            StepDefinition::new("c", "").critical(true),
        ];
        let results = vec![outcome("a", true), outcome("b", false), outcome("c", false)];

        let summary = RunSummary::from_outcomes("run", &steps, results, 9.0);
        assert_eq!(summary.total_scripts, 3);
        assert_eq!(summary.successful, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.critical_failed, vec!["c".to_string()]);
        assert_eq!(summary.status(), RunStatus::CriticalFailure);
        assert_eq!(summary.status().exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn non_critical_failure_is_partial_success() {
        let steps = vec![StepDefinition::new("a", "").critical(true), StepDefinition::new("b", "")];
        let summary = RunSummary::from_outcomes(
            "run",
            &steps,
            vec![outcome("a", true), outcome("b", false)],
            1.0,
        );
        assert_eq!(summary.status(), RunStatus::PartialSuccess);
        assert_eq!(summary.status().exit_code(), EXIT_SUCCESS);
    }

    #[test]
    fn interrupted_has_its_own_exit_code() {
        assert_eq!(RunStatus::Interrupted.exit_code(), EXIT_INTERRUPTED);
        assert_ne!(EXIT_INTERRUPTED, EXIT_FAILURE);
    }

    #[test]
    fn timestamp_is_iso8601() {
        let summary = RunSummary::from_outcomes("run", &[], vec![], 0.0);
        assert!(chrono::DateTime::parse_from_rfc3339(&summary.timestamp).is_ok());
    }
}
