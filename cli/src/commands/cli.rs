use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use collector_core::api::AppConfig;
use collector_core::config::DEFAULT_CONFIG_FILE;

#[derive(Parser, Debug, Clone)]
#[command(name = "collector", version, about = "Run the data-collection script pipeline")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// TOML config file; defaults apply when it does not exist.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    pub config: PathBuf,

    /// Project root that the scripts/data/archive/logs directories hang off.
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// Interpreter binary; skips discovery.
    #[arg(long, global = true)]
    pub interpreter: Option<String>,

    /// Per-attempt script timeout in seconds.
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Attempts for critical steps (non-critical steps always get one).
    #[arg(long, global = true)]
    pub retry_attempts: Option<u32>,

    /// Pause between steps in seconds.
    #[arg(long, value_name = "SECS", global = true)]
    pub step_delay: Option<u64>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Args {
    pub fn apply_overrides(&self, cfg: &mut AppConfig) {
        if let Some(dir) = &self.base_dir {
            cfg.paths.base_dir = dir.clone();
        }
        if let Some(path) = &self.interpreter {
            cfg.interpreter.path = Some(path.clone());
        }
        if let Some(secs) = self.timeout {
            cfg.execution.script_timeout_secs = secs;
        }
        if let Some(n) = self.retry_attempts {
            cfg.execution.retry_attempts = n;
        }
        if let Some(secs) = self.step_delay {
            cfg.execution.step_delay_secs = secs;
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run every step in order and write the execution report (default).
    Run,
    /// Verify the interpreter and script presence without running anything.
    Check,
    /// Print the configured pipeline.
    Steps(StepsArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct StepsArgs {
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_run() {
        let args = Args::try_parse_from(["collector"]).unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn flags_override_config() {
        let args = Args::try_parse_from([
            "collector",
            "run",
            "--base-dir",
            "/srv/collector",
            "--timeout",
            "60",
            "--retry-attempts",
            "3",
            "--step-delay",
            "0",
            "--interpreter",
            "/opt/R/bin/Rscript",
        ])
        .unwrap();
        assert!(matches!(args.command, Some(Commands::Run)));

        let mut cfg = AppConfig::default();
        args.apply_overrides(&mut cfg);
        assert_eq!(cfg.paths.base_dir, PathBuf::from("/srv/collector"));
        assert_eq!(cfg.execution.script_timeout_secs, 60);
        assert_eq!(cfg.execution.retry_attempts, 3);
        assert_eq!(cfg.execution.step_delay_secs, 0);
        assert_eq!(cfg.interpreter.path.as_deref(), Some("/opt/R/bin/Rscript"));
    }

    #[test]
    fn steps_accepts_json_flag() {
        let args = Args::try_parse_from(["collector", "steps", "--json"]).unwrap();
        assert!(matches!(args.command, Some(Commands::Steps(StepsArgs { json: true }))));
    }
}
