use collector_core::api::{
    check_scripts, ensure_directories, resolve_interpreter, verify_interpreter, AppConfig,
    ResolvedInterpreter, ResolvedPaths, SetupError, EXIT_FAILURE, EXIT_SUCCESS,
};

/// Interpreter resolution and verification, working directories, script presence.
pub async fn preflight(
    cfg: &AppConfig,
    paths: &ResolvedPaths,
) -> Result<ResolvedInterpreter, SetupError> {
    let interpreter = resolve_interpreter(&cfg.interpreter)?;
    let version = verify_interpreter(&interpreter.path, cfg.interpreter.verify_timeout()).await?;
    tracing::info!(
        source = ?interpreter.source,
        "✅ interpreter: {} ({version})",
        interpreter.path.display()
    );

    ensure_directories(paths)?;
    check_scripts(paths, &cfg.steps)?;
    tracing::info!("✅ all {} scripts present", cfg.steps.len());
    Ok(interpreter)
}

pub async fn execute(cfg: &AppConfig) -> anyhow::Result<i32> {
    let paths = cfg.paths.resolve();
    match preflight(cfg, &paths).await {
        Ok(_) => Ok(EXIT_SUCCESS),
        Err(e) => {
            log_setup_error(&paths, &e);
            Ok(EXIT_FAILURE)
        }
    }
}

pub fn log_setup_error(paths: &ResolvedPaths, err: &SetupError) {
    if let SetupError::MissingScripts(names) = err {
        for name in names {
            tracing::error!("   missing: {}", paths.scripts_dir.join(name).display());
        }
    }
    tracing::error!("❌ {err}");
}
