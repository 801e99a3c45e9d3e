use std::path::Path;

use anyhow::Context;
use collector_core::api::{
    apply_env_overrides, load_env_file, read_config_file, AppConfig, EnvFileStatus,
};

use crate::commands::{self, cli};
use crate::logging;

pub async fn run(args: cli::Args) -> anyhow::Result<i32> {
    let command = args.command.clone().unwrap_or(cli::Commands::Run);
    let cfg = load_config(&args)?;
    let paths = cfg.paths.resolve();

    // Listing steps should not leave log files or a bootstrapped `.env` behind.
    let file_logging = !matches!(command, cli::Commands::Steps(_));
    let _guard = logging::init(
        file_logging.then_some(paths.logs_dir.as_path()),
        args.verbose,
    )?;
    tracing::debug!(
        config = %args.config.display(),
        base_dir = %paths.base_dir.display(),
        "configuration loaded"
    );

    match command {
        cli::Commands::Run => {
            bootstrap_env(&paths.config_dir);
            commands::run::execute(&cfg).await
        }
        cli::Commands::Check => {
            bootstrap_env(&paths.config_dir);
            commands::check::execute(&cfg).await
        }
        cli::Commands::Steps(steps_args) => commands::steps::execute(&cfg, &steps_args),
    }
}

/// Config file, then process environment, then command-line flags.
fn load_config(args: &cli::Args) -> anyhow::Result<AppConfig> {
    let mut cfg = read_config_file(&args.config)?;
    apply_env_overrides(&mut cfg, |k| std::env::var(k).ok())?;
    args.apply_overrides(&mut cfg);
    cfg.validate()
        .with_context(|| format!("invalid configuration ({})", args.config.display()))?;
    Ok(cfg)
}

/// Script parameters live in `<config_dir>/.env`; a broken file is not fatal.
fn bootstrap_env(config_dir: &Path) {
    match load_env_file(config_dir) {
        Ok(EnvFileStatus::Created(path)) => {
            tracing::info!("📝 created default env file: {}", path.display());
        }
        Ok(EnvFileStatus::Loaded(path)) => {
            tracing::debug!(path = %path.display(), "env file loaded");
        }
        Err(e) => tracing::warn!("⚠️ {e}"),
    }
}
