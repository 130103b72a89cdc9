//! Storage backends for the `orders` table
//!
//! [`OrderStore`] is the single seam between the pipeline and a database.
//! Calls are blocking and made in sequence on one session; the loader wraps
//! a whole batch in `begin` / `commit`, and `rollback` on any failure.

#[cfg(feature = "duckdb-backend")]
mod duckdb_impl;
#[cfg(feature = "postgres-backend")]
mod postgres_impl;
pub mod schema;

#[cfg(feature = "duckdb-backend")]
pub use duckdb_impl::DuckDbStore;
#[cfg(feature = "postgres-backend")]
pub use postgres_impl::PostgresStore;
pub use schema::OrdersSchema;

use crate::error::LoaderError;
use crate::models::OrderRow;

/// Result of an idempotent bootstrap step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Created,
    AlreadyExists,
}

/// A database session holding the `orders` table
pub trait OrderStore {
    /// Human-readable target for logs (no credentials)
    fn describe(&self) -> String;

    /// Create the target database if the server does not have it
    fn ensure_database(&mut self) -> Result<BootstrapOutcome, LoaderError>;

    /// Create the `orders` table if it does not exist
    fn ensure_table(&mut self) -> Result<BootstrapOutcome, LoaderError>;

    /// Open the batch transaction
    fn begin(&mut self) -> Result<(), LoaderError>;

    /// Commit the batch transaction
    fn commit(&mut self) -> Result<(), LoaderError>;

    /// Discard everything since `begin`
    fn rollback(&mut self) -> Result<(), LoaderError>;

    /// Whether a row with this primary key is already stored
    fn order_exists(&mut self, order_id: &str) -> Result<bool, LoaderError>;

    /// Insert one new row
    fn insert_order(&mut self, row: &OrderRow) -> Result<(), LoaderError>;

    /// Read back a stored row
    fn fetch_order(&mut self, order_id: &str) -> Result<Option<OrderRow>, LoaderError>;

    /// Number of stored rows
    fn count_orders(&mut self) -> Result<i64, LoaderError>;
}

impl<S: OrderStore + ?Sized> OrderStore for Box<S> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn ensure_database(&mut self) -> Result<BootstrapOutcome, LoaderError> {
        (**self).ensure_database()
    }

    fn ensure_table(&mut self) -> Result<BootstrapOutcome, LoaderError> {
        (**self).ensure_table()
    }

    fn begin(&mut self) -> Result<(), LoaderError> {
        (**self).begin()
    }

    fn commit(&mut self) -> Result<(), LoaderError> {
        (**self).commit()
    }

    fn rollback(&mut self) -> Result<(), LoaderError> {
        (**self).rollback()
    }

    fn order_exists(&mut self, order_id: &str) -> Result<bool, LoaderError> {
        (**self).order_exists(order_id)
    }

    fn insert_order(&mut self, row: &OrderRow) -> Result<(), LoaderError> {
        (**self).insert_order(row)
    }

    fn fetch_order(&mut self, order_id: &str) -> Result<Option<OrderRow>, LoaderError> {
        (**self).fetch_order(order_id)
    }

    fn count_orders(&mut self) -> Result<i64, LoaderError> {
        (**self).count_orders()
    }
}
