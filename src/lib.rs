//! Order Loader - idempotent batch import of JSON order exports
//!
//! Loads a JSON array of order records into a relational `orders` table.
//! Re-running the same file is safe: rows are keyed by `order_id` and an
//! existing id is always skipped, never overwritten.
//!
//! # Pipeline
//!
//! ```text
//! connect ─► ensure database ─► ensure table ─► parse file ─► load records ─► commit
//!                                                                 │
//!                                          (order_id exists? skip : normalize + insert)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use order_loader::{DuckDbStore, LoaderConfig, pipeline};
//!
//! let config = LoaderConfig::default();
//! let store = DuckDbStore::open("orders.duckdb")?;
//! let stats = pipeline::run_with_store(Box::new(store), &config)?;
//! println!("{} inserted, {} skipped", stats.processed_count, stats.skipped_duplicates);
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod store;
pub mod transform;

pub use config::{Backend, DatabaseConfig, EnvFile, LoaderConfig, LoggingConfig};
pub use error::LoaderError;
pub use loader::{LoadStats, OrderLoader};
pub use models::{Customer, OrderRecord, OrderRow};
pub use parser::parse_orders;
#[cfg(feature = "duckdb-backend")]
pub use store::DuckDbStore;
#[cfg(feature = "postgres-backend")]
pub use store::PostgresStore;
pub use store::{BootstrapOutcome, OrderStore};
pub use transform::normalize_date;

/// Input file loaded by the binary. Not configurable from the command line.
pub const DEFAULT_INPUT_FILE: &str = "ozon_orders.json";

/// Name of the target table
pub const ORDERS_TABLE: &str = "orders";
