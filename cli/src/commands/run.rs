use std::future::Future;
use std::sync::Arc;

use collector_core::api::{
    AppConfig, Pipeline, ReportWriter, RunStatus, StepDefinition, StepRunner, TokioSleeper,
    EXIT_FAILURE,
};

use super::check;

pub async fn execute(cfg: &AppConfig) -> anyhow::Result<i32> {
    let paths = cfg.paths.resolve();
    let interpreter = match check::preflight(cfg, &paths).await {
        Ok(interpreter) => interpreter,
        Err(e) => {
            check::log_setup_error(&paths, &e);
            return Ok(EXIT_FAILURE);
        }
    };

    let runner = Arc::new(StepRunner::new(interpreter.path, paths.clone(), &cfg.execution));
    let pipeline = Pipeline::new(runner, Arc::new(TokioSleeper), &cfg.execution);
    let report = ReportWriter::new(&paths.report_path);

    Ok(run_until_interrupted(&pipeline, &cfg.steps, &report, ctrl_c()).await)
}

/// Run the pipeline unless `interrupt` resolves first, then save the report.
///
/// On interrupt the pipeline future is dropped, which kills the running child
/// (`kill_on_drop`), and no report is written.
pub async fn run_until_interrupted<I>(
    pipeline: &Pipeline,
    steps: &[StepDefinition],
    report: &ReportWriter,
    interrupt: I,
) -> i32
where
    I: Future<Output = ()>,
{
    let summary = tokio::select! {
        biased;
        _ = interrupt => {
            tracing::warn!("⚠️ interrupted by user");
            return RunStatus::Interrupted.exit_code();
        }
        summary = pipeline.run_all(steps) => summary,
    };

    match report.save(&summary).await {
        Ok(path) => tracing::info!("💾 report saved: {}", path.display()),
        Err(e) => tracing::error!("❌ could not save report: {e}"),
    }

    summary.status().exit_code()
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
