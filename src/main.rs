//! Nudger CLI entrypoint for reviewer notifications.

mod cli;

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use nudger::{NudgerConfig, RunError};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(code) => code,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode, RunError> {
    let config = load_config()?;
    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let mut stdout = io::stdout();
    let summary = cli::notify_reviewers::run(&config, cancel.clone(), &mut stdout).await?;

    Ok(ExitCode::from(cli::exit_status::for_run(
        &summary,
        config.fail_on_undelivered,
        cancel.is_cancelled(),
    )))
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`RunError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<NudgerConfig, RunError> {
    cli::arguments::load_config_from(env::args_os()).map_err(RunError::from)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received; cancelling pending notifications");
            cancel.cancel();
        }
    });
}
