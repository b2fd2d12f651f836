//! frontmost CLI
//!
//! Prints the name, bundle identifier, and bundle path of the application
//! that currently has input focus. Command-line arguments are ignored.

use anyhow::Result;
use frontmost_core::{report, Config, ReportError};
use frontmost_platform::NativeQuery;
use std::io;
use std::process::ExitCode;
use tracing::{info, warn};

fn main() -> ExitCode {
    if let Err(e) = init_logging() {
        eprintln!("frontmost: failed to initialize logging: {}", e);
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("frontmost: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging() -> Result<()> {
    // stdout carries the result, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("frontmost=warn".parse()?),
        )
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))
}

fn run() -> Result<()> {
    let config = Config::from_env().unwrap_or_else(|e| {
        warn!(error = %e, "invalid configuration, using defaults");
        Config::default()
    });

    let mut stdout = io::stdout().lock();
    match report(NativeQuery::new(), &config, &mut stdout) {
        Ok(app) => {
            info!(name = ?app.name, bundle_id = ?app.bundle_id, "reported active application");
            Ok(())
        }
        Err(ReportError::Query(e)) => Err(anyhow::Error::new(e).context("could not determine active application")),
        Err(e) => Err(e.into()),
    }
}
