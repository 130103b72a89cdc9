//! SQL for the `orders` table
//!
//! `date` is quoted everywhere because it is a type name in both dialects.
//! The column stays TEXT so an unparseable input date can be stored verbatim.

/// Statements for the `orders` table, per dialect
pub struct OrdersSchema;

impl OrdersSchema {
    /// DDL (PostgreSQL syntax)
    pub fn create_table_postgres() -> &'static str {
        r#"
CREATE TABLE IF NOT EXISTS orders (
    order_id TEXT PRIMARY KEY,
    status TEXT,
    "date" TEXT,
    amount REAL,
    customer_region TEXT
)
"#
    }

    /// DDL (DuckDB syntax)
    pub fn create_table_duckdb() -> &'static str {
        r#"
CREATE TABLE IF NOT EXISTS orders (
    order_id VARCHAR PRIMARY KEY,
    status VARCHAR,
    "date" VARCHAR,
    amount REAL,
    customer_region VARCHAR
)
"#
    }

    pub fn table_exists_postgres() -> &'static str {
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = current_schema() AND table_name = $1::TEXT
        )"
    }

    pub fn table_exists_duckdb() -> &'static str {
        "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?"
    }

    pub fn database_exists_postgres() -> &'static str {
        "SELECT 1 FROM pg_database WHERE datname = $1"
    }

    /// `CREATE DATABASE` cannot take a bind parameter, so the name is quoted here
    pub fn create_database_postgres(name: &str) -> String {
        format!("CREATE DATABASE {}", quote_identifier(name))
    }

    pub fn order_exists_postgres() -> &'static str {
        "SELECT 1 FROM orders WHERE order_id = $1"
    }

    pub fn order_exists_duckdb() -> &'static str {
        "SELECT COUNT(*) FROM orders WHERE order_id = ?"
    }

    /// The explicit cast lets an f64 bind into the REAL column
    pub fn insert_order_postgres() -> &'static str {
        r#"INSERT INTO orders (order_id, status, "date", amount, customer_region)
           VALUES ($1, $2, $3, $4::DOUBLE PRECISION, $5)"#
    }

    pub fn insert_order_duckdb() -> &'static str {
        r#"INSERT INTO orders (order_id, status, "date", amount, customer_region)
           VALUES (?, ?, ?, ?, ?)"#
    }

    pub fn select_order_postgres() -> &'static str {
        r#"SELECT order_id, status, "date", amount::DOUBLE PRECISION, customer_region
           FROM orders WHERE order_id = $1"#
    }

    pub fn select_order_duckdb() -> &'static str {
        r#"SELECT order_id, status, "date", CAST(amount AS DOUBLE), customer_region
           FROM orders WHERE order_id = ?"#
    }

    pub fn count_orders() -> &'static str {
        "SELECT COUNT(*) FROM orders"
    }
}

/// Quote an SQL identifier, doubling embedded quotes
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
