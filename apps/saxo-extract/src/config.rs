//! Command-line configuration.
//!
//! # Environment Variables
//!
//! - `SAXO_USER`: username, instead of `-u`
//! - `SAXO_PASSWORD`: password, instead of `-p`
//! - `SAXO_IDENTITY_FILE`: identity file path (default: `identity.json`)
//! - `RUST_LOG`: log filter (default: `saxo_extract=info`)
//!
//! A `.env` file in the working directory is loaded before parsing.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::Parser;

use crate::domain::credentials::DEFAULT_DEVICE_NAME;
use crate::domain::{Credentials, DateRange, LoginMode, ValidationError};
use crate::infrastructure::identity::IDENTITY_FILENAME;
use crate::infrastructure::saxo::SaxoConfig;

/// Fetch transaction data from Saxo Bank.
#[derive(Debug, Clone, Parser)]
#[command(name = "saxo-extract", version, about)]
pub struct Cli {
    /// Run the program for the first time and log in using two factor login
    #[arg(short = 'f', long = "firstrun")]
    pub first_run: bool,

    /// Saxo Bank user name
    #[arg(short = 'u', long = "user", env = "SAXO_USER")]
    pub user: String,

    /// Saxo Bank password
    #[arg(short = 'p', long = "password", env = "SAXO_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Get data from this date, format yyyy-mm-dd
    #[arg(short = 's', long = "startdate")]
    pub start_date: String,

    /// Get data to and including this date, format yyyy-mm-dd, default is today
    #[arg(short = 'e', long = "enddate")]
    pub end_date: Option<String>,

    /// Device name shown in the bank's device list
    #[arg(short = 'd', long = "devicename", default_value = DEFAULT_DEVICE_NAME)]
    pub device_name: String,

    /// Where the device identity is stored
    #[arg(long, env = "SAXO_IDENTITY_FILE", default_value = IDENTITY_FILENAME)]
    pub identity_file: PathBuf,

    /// Abort any single request after this many seconds (default: wait indefinitely)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Print the collected data as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// Validated settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Login credentials.
    pub credentials: Credentials,
    /// First run (two-factor) or returning run.
    pub mode: LoginMode,
    /// Transactions period.
    pub range: DateRange,
    /// Device identity file.
    pub identity_file: PathBuf,
    /// Provider session settings.
    pub saxo: SaxoConfig,
    /// Print the report as JSON.
    pub print_json: bool,
}

impl Cli {
    /// Validate against `today` and build the run configuration.
    pub fn into_run_config(self, today: NaiveDate) -> Result<RunConfig, ValidationError> {
        let end = self
            .end_date
            .unwrap_or_else(|| today.format(crate::domain::date_range::DATE_FORMAT).to_string());
        let range = DateRange::validate(&self.start_date, &end, today)?;

        let mode = if self.first_run {
            LoginMode::FirstRun {
                device_name: self.device_name,
            }
        } else {
            LoginMode::Returning
        };

        let mut saxo = SaxoConfig::default();
        if let Some(secs) = self.timeout_secs {
            saxo = saxo.with_timeout(Duration::from_secs(secs));
        }

        Ok(RunConfig {
            credentials: Credentials::new(self.user, self.password),
            mode,
            range,
            identity_file: self.identity_file,
            saxo,
            print_json: self.json,
        })
    }
}

/// Today's date in local time.
#[must_use]
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
