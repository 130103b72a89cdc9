//! Error types for the order loading pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading orders
#[derive(Error, Debug)]
pub enum LoaderError {
    /// Database server unreachable or credentials rejected
    #[error("Connection error ({target}): {reason}")]
    Connection { target: String, reason: String },

    /// Database or table bootstrap failed
    #[error("Schema error during {operation}: {reason}")]
    Schema { operation: String, reason: String },

    /// Input file does not exist
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Input file is not a JSON array of order objects
    #[error("Invalid JSON in {path}: {reason}")]
    Format { path: PathBuf, reason: String },

    /// Any other read failure
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Duplicate check or insert failed for a record
    #[error("Row error for order {order_id}: {reason}")]
    Row { order_id: String, reason: String },

    /// A record has no order_id and cannot be keyed
    #[error("Record {index} has no order_id")]
    MissingOrderId { index: usize },

    /// Transaction boundary failed
    #[error("Transaction error during {operation}: {reason}")]
    Transaction { operation: String, reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl LoaderError {
    #[cfg(any(test, feature = "duckdb-backend", feature = "postgres-backend"))]
    pub(crate) fn connection(target: impl Into<String>, reason: impl ToString) -> Self {
        LoaderError::Connection {
            target: target.into(),
            reason: reason.to_string(),
        }
    }

    #[cfg(any(test, feature = "duckdb-backend", feature = "postgres-backend"))]
    pub(crate) fn schema(operation: impl Into<String>, reason: impl ToString) -> Self {
        LoaderError::Schema {
            operation: operation.into(),
            reason: reason.to_string(),
        }
    }

    #[cfg(any(test, feature = "duckdb-backend", feature = "postgres-backend"))]
    pub(crate) fn row(order_id: impl Into<String>, reason: impl ToString) -> Self {
        LoaderError::Row {
            order_id: order_id.into(),
            reason: reason.to_string(),
        }
    }

    #[cfg(any(test, feature = "duckdb-backend", feature = "postgres-backend"))]
    pub(crate) fn transaction(operation: impl Into<String>, reason: impl ToString) -> Self {
        LoaderError::Transaction {
            operation: operation.into(),
            reason: reason.to_string(),
        }
    }

    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            LoaderError::Connection { target, reason } => {
                format!(
                    "Cannot connect to {target}: {reason}\n\n\
                    Hint: Check DB_HOST, DB_PORT, DB_USER and DB_PASSWORD."
                )
            }
            LoaderError::NotFound(path) => {
                format!(
                    "File not found: {}\n\nHint: Place the export next to the binary or set input_path in the config file.",
                    path.display()
                )
            }
            LoaderError::Format { path, reason } => {
                format!(
                    "Invalid JSON in {}: {reason}\n\nHint: The file must contain a JSON array of order objects.",
                    path.display()
                )
            }
            LoaderError::MissingOrderId { index } => {
                format!(
                    "Record {index} has no order_id.\n\nHint: Every order needs an order_id; nothing from this run was saved."
                )
            }
            LoaderError::Row { order_id, reason } => {
                format!(
                    "Failed to store order {order_id}: {reason}\n\nHint: Nothing from this run was saved; rerun once the cause is fixed."
                )
            }
            _ => self.to_string(),
        }
    }

    /// Whether the failure happened before any row could be written
    pub fn is_startup_error(&self) -> bool {
        matches!(
            self,
            LoaderError::Connection { .. }
                | LoaderError::Schema { .. }
                | LoaderError::NotFound(_)
                | LoaderError::Format { .. }
                | LoaderError::Io { .. }
                | LoaderError::Config(_)
        )
    }
}
