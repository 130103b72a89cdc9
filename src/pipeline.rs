//! Load pipeline driver
//!
//! connect → ensure database → ensure table → parse → load → close.
//! Every stage logs its own failure with context and returns it; the caller
//! (the binary) owns the single top-level report.

use crate::config::{Backend, DatabaseConfig, LoaderConfig};
use crate::error::LoaderError;
use crate::loader::{LoadStats, OrderLoader};
use crate::parser::parse_orders;
use crate::store::OrderStore;

/// Open a session on the configured backend
pub fn open_store(config: &DatabaseConfig) -> Result<Box<dyn OrderStore>, LoaderError> {
    match config.backend {
        Backend::Postgres => {
            #[cfg(feature = "postgres-backend")]
            {
                let store = crate::store::PostgresStore::connect(config)?;
                Ok(Box::new(store))
            }
            #[cfg(not(feature = "postgres-backend"))]
            {
                Err(LoaderError::Config(
                    "PostgreSQL support not enabled. Build with --features postgres-backend"
                        .to_string(),
                ))
            }
        }
        Backend::DuckDb => {
            #[cfg(feature = "duckdb-backend")]
            {
                let store = crate::store::DuckDbStore::open(&config.duckdb_path)?;
                Ok(Box::new(store))
            }
            #[cfg(not(feature = "duckdb-backend"))]
            {
                Err(LoaderError::Config(
                    "DuckDB support not enabled. Build with --features duckdb-backend".to_string(),
                ))
            }
        }
    }
}

/// Connect to the configured database and run the whole pipeline
pub fn run(config: &LoaderConfig) -> Result<LoadStats, LoaderError> {
    let store = open_store(&config.database)?;
    run_with_store(store, config)
}

/// Run the pipeline on an already opened store.
///
/// The store is consumed and dropped before returning, on success and on
/// failure alike, which closes the database session.
pub fn run_with_store<S: OrderStore>(
    mut store: S,
    config: &LoaderConfig,
) -> Result<LoadStats, LoaderError> {
    tracing::info!("Starting data loading process ({})", store.describe());
    let result = load(&mut store, config);
    drop(store);
    tracing::info!("DB connection closed");
    result
}

fn load<S: OrderStore + ?Sized>(
    store: &mut S,
    config: &LoaderConfig,
) -> Result<LoadStats, LoaderError> {
    store.ensure_database()?;
    store.ensure_table()?;

    let records = parse_orders(&config.input_path)?;
    let stats = OrderLoader::new(store, config.progress_interval).load_all(&records)?;

    tracing::info!(
        "Data loading process completed successfully. Processed: {}, Skipped duplicates: {} ({})",
        stats.processed_count,
        stats.skipped_duplicates,
        stats.duration_string()
    );
    match store.count_orders() {
        Ok(total) => tracing::info!("Table now holds {} orders", total),
        Err(e) => tracing::warn!("Could not count stored orders: {}", e),
    }
    Ok(stats)
}
