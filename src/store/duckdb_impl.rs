//! DuckDB store (embedded)

use std::path::Path;

use duckdb::{Connection, params};

use super::schema::OrdersSchema;
use super::{BootstrapOutcome, OrderStore};
use crate::ORDERS_TABLE;
use crate::error::LoaderError;
use crate::models::OrderRow;

/// Orders table in an embedded DuckDB database.
///
/// The database is the file itself, so there is no catalog to bootstrap:
/// opening the file creates it.
pub struct DuckDbStore {
    conn: Connection,
    path: Option<String>,
}

impl DuckDbStore {
    /// Open or create a database file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let target = format!("duckdb:{}", path.display());
        tracing::info!("Connecting to {}", target);

        let conn = Connection::open(path).map_err(|e| {
            let err = LoaderError::connection(&target, e);
            tracing::error!("{}", err);
            err
        })?;
        Ok(Self {
            conn,
            path: Some(path.display().to_string()),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn memory() -> Result<Self, LoaderError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| LoaderError::connection("duckdb::memory:", e))?;
        Ok(Self { conn, path: None })
    }

    /// Get the database path (if not in-memory)
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    fn table_exists(&self) -> Result<bool, LoaderError> {
        let count: i64 = self
            .conn
            .query_row(OrdersSchema::table_exists_duckdb(), [ORDERS_TABLE], |row| {
                row.get(0)
            })
            .map_err(|e| LoaderError::schema("table lookup", e))?;
        Ok(count > 0)
    }

    fn create_table_if_missing(&self) -> Result<BootstrapOutcome, LoaderError> {
        if self.table_exists()? {
            tracing::info!("Table '{}' already exists", ORDERS_TABLE);
            return Ok(BootstrapOutcome::AlreadyExists);
        }

        tracing::info!("Table '{}' does not exist. Creating...", ORDERS_TABLE);
        self.conn
            .execute_batch(OrdersSchema::create_table_duckdb())
            .map_err(|e| LoaderError::schema("create table", e))?;
        tracing::info!("Table '{}' created successfully", ORDERS_TABLE);
        Ok(BootstrapOutcome::Created)
    }

    fn transaction_statement(&self, operation: &str, sql: &str) -> Result<(), LoaderError> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| LoaderError::transaction(operation, e))
    }
}

impl OrderStore for DuckDbStore {
    fn describe(&self) -> String {
        match self.path() {
            Some(path) => format!("duckdb:{}", path),
            None => "duckdb::memory:".to_string(),
        }
    }

    fn ensure_database(&mut self) -> Result<BootstrapOutcome, LoaderError> {
        tracing::info!("Database {} already exists", self.describe());
        Ok(BootstrapOutcome::AlreadyExists)
    }

    fn ensure_table(&mut self) -> Result<BootstrapOutcome, LoaderError> {
        self.create_table_if_missing()
            .inspect_err(|e| tracing::error!("Error checking/creating table: {}", e))
    }

    fn begin(&mut self) -> Result<(), LoaderError> {
        self.transaction_statement("begin", "BEGIN TRANSACTION")
    }

    fn commit(&mut self) -> Result<(), LoaderError> {
        self.transaction_statement("commit", "COMMIT")
    }

    fn rollback(&mut self) -> Result<(), LoaderError> {
        self.transaction_statement("rollback", "ROLLBACK")
    }

    fn order_exists(&mut self, order_id: &str) -> Result<bool, LoaderError> {
        let count: i64 = self
            .conn
            .query_row(OrdersSchema::order_exists_duckdb(), [order_id], |row| {
                row.get(0)
            })
            .map_err(|e| LoaderError::row(order_id, e))?;
        Ok(count > 0)
    }

    fn insert_order(&mut self, row: &OrderRow) -> Result<(), LoaderError> {
        self.conn
            .execute(
                OrdersSchema::insert_order_duckdb(),
                params![
                    row.order_id,
                    row.status,
                    row.date,
                    row.amount,
                    row.customer_region
                ],
            )
            .map_err(|e| LoaderError::row(&row.order_id, e))?;
        Ok(())
    }

    fn fetch_order(&mut self, order_id: &str) -> Result<Option<OrderRow>, LoaderError> {
        let mut stmt = self
            .conn
            .prepare(OrdersSchema::select_order_duckdb())
            .map_err(|e| LoaderError::row(order_id, e))?;
        let mut rows = stmt
            .query_map([order_id], |row| {
                Ok(OrderRow {
                    order_id: row.get(0)?,
                    status: row.get(1)?,
                    date: row.get(2)?,
                    amount: row.get(3)?,
                    customer_region: row.get(4)?,
                })
            })
            .map_err(|e| LoaderError::row(order_id, e))?;

        rows.next()
            .transpose()
            .map_err(|e| LoaderError::row(order_id, e))
    }

    fn count_orders(&mut self) -> Result<i64, LoaderError> {
        self.conn
            .query_row(OrdersSchema::count_orders(), [], |row| row.get(0))
            .map_err(|e| LoaderError::transaction("count", e))
    }
}
