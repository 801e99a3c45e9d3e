use clap::Parser;
use collector_core::api::EXIT_FAILURE;

mod app;
mod commands;
mod logging;

use commands::cli;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();

    // `app::run` owns the log guard; it has to be dropped (and flushed) before `exit`.
    let code = match app::run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("collector: {e:#}");
            EXIT_FAILURE
        }
    };
    std::process::exit(code);
}
