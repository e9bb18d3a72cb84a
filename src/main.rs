//! ecdeps - find candidate EasyBuild modules for the dependencies of an EasyConfig

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod config;
mod easyconfig;
mod error;
mod package;
mod search;

use cli::Cli;
use config::Config;

/// Initialize logging on stderr so search output on stdout stays untouched.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug level.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("ecdeps=debug")
        } else {
            EnvFilter::new("ecdeps=info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    tracing::debug!("ecdeps starting with args: {:?}", cli);

    let result = Config::load(cli.config.as_deref()).and_then(|config| cli::execute(&cli, config));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
