//! CLI module for the order-loader binary

pub mod output;

use clap::Parser;
use std::path::PathBuf;

use crate::config::Backend;

#[derive(Parser, Debug)]
#[command(name = "order-loader")]
#[command(author, version, about = "Load a JSON order export into the orders table", long_about = None)]
pub struct Cli {
    /// Path to a TOML config file (default: ./order-loader.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Dotenv file with DB_* credentials; process variables take precedence
    #[arg(long, default_value = crate::config::DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    /// Override the configured database backend (postgres, duckdb)
    #[arg(short, long)]
    pub backend: Option<Backend>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}
