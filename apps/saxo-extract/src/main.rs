//! Saxo Extract Binary
//!
//! # Usage
//!
//! ```bash
//! # First run: two-factor login, registers this device
//! saxo-extract -f -u USER -p PASSWORD -s 2024-01-01
//!
//! # Later runs reuse identity.json
//! saxo-extract -u USER -p PASSWORD -s 2024-01-01 -e 2024-01-31 --json
//! ```
//!
//! See [`saxo_extract::config`] for environment variables.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use saxo_extract::config::{self, Cli};
use saxo_extract::telemetry::init_tracing;
use saxo_extract::{AppError, TerminalTwoFactorPrompt};

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();
    let cli = Cli::parse();
    init_tracing();

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn execute(cli: Cli) -> Result<(), AppError> {
    let config = cli.into_run_config(config::today())?;
    tracing::info!(
        from = %config.range.from(),
        to = %config.range.to(),
        first_run = config.mode.is_first_run(),
        identity_file = %config.identity_file.display(),
        "Configuration loaded"
    );

    let report = saxo_extract::run(&config, TerminalTwoFactorPrompt::new()).await?;

    if config.print_json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| AppError::Output(e.to_string()))?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{json}").map_err(|e| AppError::Output(e.to_string()))?;
    }
    Ok(())
}

/// Load .env from the working directory, if present.
fn load_dotenv() {
    match dotenvy::dotenv() {
        Err(e) if !e.not_found() => eprintln!("Warning: could not load .env: {e}"),
        _ => {}
    }
}
