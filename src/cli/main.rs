//! order-loader - load a JSON order export into the orders table
//!
//! Reads `ozon_orders.json` from the working directory, creates the target
//! database and `orders` table when missing, and inserts orders whose
//! `order_id` is not stored yet.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use order_loader::cli::Cli;
use order_loader::cli::output::{format_error, format_summary};
use order_loader::{EnvFile, LoaderConfig, logging, pipeline};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let env_file = match EnvFile::read(&cli.env_file) {
        Ok(env_file) => env_file,
        Err(e) => {
            println!("{}", format_error(&e));
            return ExitCode::FAILURE;
        }
    };
    let mut config = match LoaderConfig::load(cli.config.as_deref(), &env_file) {
        Ok(config) => config,
        Err(e) => {
            println!("{}", format_error(&e));
            return ExitCode::FAILURE;
        }
    };
    if let Some(backend) = cli.backend {
        config.database.backend = backend;
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    if let Err(e) = logging::init_file_logging(&config.logging).context("Failed to setup logging") {
        eprintln!("Warning: {:#}", e);
    }
    env_file.log_status();
    tracing::debug!("Loaded configuration: {:?}", config);

    match pipeline::run(&config) {
        Ok(stats) => {
            println!("{}", format_summary(&stats));
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Critical error in data loading process: {}", e);
            if e.is_startup_error() {
                tracing::error!("Run stopped before loading; the orders table was not touched");
            } else {
                tracing::error!("Batch rolled back; no orders from this run were saved");
            }
            println!("{}", format_error(&e));
            ExitCode::FAILURE
        }
    }
}
