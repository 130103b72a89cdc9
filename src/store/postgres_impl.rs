//! PostgreSQL store
//!
//! `tokio-postgres` is async; the store owns a current-thread runtime and
//! blocks on every call, so the pipeline stays sequential. The connection
//! task spawned on that runtime only makes progress inside `block_on`,
//! which is exactly when the client is waiting on it.

use tokio::runtime::Runtime;
use tokio_postgres::{Client, NoTls};

use super::schema::OrdersSchema;
use super::{BootstrapOutcome, OrderStore};
use crate::ORDERS_TABLE;
use crate::config::DatabaseConfig;
use crate::error::LoaderError;
use crate::models::OrderRow;

/// Orders table on a PostgreSQL server
pub struct PostgresStore {
    runtime: Runtime,
    client: Client,
    config: DatabaseConfig,
    /// Database the current session is attached to
    current_database: String,
}

impl PostgresStore {
    /// Open a session on the maintenance database.
    ///
    /// The target database may not exist yet; [`OrderStore::ensure_database`]
    /// creates it if needed and moves the session over.
    pub fn connect(config: &DatabaseConfig) -> Result<Self, LoaderError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LoaderError::connection(config.target(), e))?;

        let client = open_session(&runtime, config, &config.maintenance_database)?;

        Ok(Self {
            runtime,
            client,
            config: config.clone(),
            current_database: config.maintenance_database.clone(),
        })
    }

    /// Database the session is currently attached to
    pub fn current_database(&self) -> &str {
        &self.current_database
    }

    fn create_database_if_missing(&mut self) -> Result<BootstrapOutcome, LoaderError> {
        let name = &self.config.name;
        let existing = self
            .runtime
            .block_on(
                self.client
                    .query_opt(OrdersSchema::database_exists_postgres(), &[name]),
            )
            .map_err(|e| LoaderError::schema("database lookup", e))?;

        let outcome = if existing.is_some() {
            tracing::info!("Database {} already exists", name);
            BootstrapOutcome::AlreadyExists
        } else {
            tracing::info!("Database {} does not exist. Creating...", name);
            // No BEGIN is open here, so the statement runs in auto-commit mode
            self.runtime
                .block_on(
                    self.client
                        .batch_execute(&OrdersSchema::create_database_postgres(name)),
                )
                .map_err(|e| LoaderError::schema("create database", e))?;
            tracing::info!("Database {} created successfully", name);
            BootstrapOutcome::Created
        };

        if self.current_database != self.config.name {
            self.client = open_session(&self.runtime, &self.config, &self.config.name)?;
            self.current_database = self.config.name.clone();
        }

        Ok(outcome)
    }

    fn create_table_if_missing(&self) -> Result<BootstrapOutcome, LoaderError> {
        let exists: bool = self
            .runtime
            .block_on(
                self.client
                    .query_one(OrdersSchema::table_exists_postgres(), &[&ORDERS_TABLE]),
            )
            .map_err(|e| LoaderError::schema("table lookup", e))?
            .get(0);

        if exists {
            tracing::info!("Table '{}' already exists", ORDERS_TABLE);
            return Ok(BootstrapOutcome::AlreadyExists);
        }

        tracing::info!("Table '{}' does not exist. Creating...", ORDERS_TABLE);
        self.runtime
            .block_on(
                self.client
                    .batch_execute(OrdersSchema::create_table_postgres()),
            )
            .map_err(|e| LoaderError::schema("create table", e))?;
        tracing::info!("Table '{}' created successfully", ORDERS_TABLE);
        Ok(BootstrapOutcome::Created)
    }

    fn transaction_statement(&self, operation: &str, sql: &str) -> Result<(), LoaderError> {
        self.runtime
            .block_on(self.client.batch_execute(sql))
            .map_err(|e| LoaderError::transaction(operation, e))
    }
}

fn open_session(
    runtime: &Runtime,
    config: &DatabaseConfig,
    dbname: &str,
) -> Result<Client, LoaderError> {
    let target = format!("{}@{}:{}/{}", config.user, config.host, config.port, dbname);
    tracing::info!("Connecting to {}:{} (database {})", config.host, config.port, dbname);

    let mut pg = tokio_postgres::Config::new();
    pg.user(config.user.as_str())
        .password(config.password.as_str())
        .host(config.host.as_str())
        .port(config.port)
        .dbname(dbname);

    let (client, connection) = runtime.block_on(pg.connect(NoTls)).map_err(|e| {
        let err = LoaderError::connection(&target, e);
        tracing::error!("{}", err);
        err
    })?;

    runtime.spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!("PostgreSQL connection error: {}", e);
        }
    });

    Ok(client)
}

impl OrderStore for PostgresStore {
    fn describe(&self) -> String {
        format!(
            "{}@{}:{}/{}",
            self.config.user, self.config.host, self.config.port, self.current_database
        )
    }

    fn ensure_database(&mut self) -> Result<BootstrapOutcome, LoaderError> {
        self.create_database_if_missing()
            .inspect_err(|e| tracing::error!("Error checking/creating database: {}", e))
    }

    fn ensure_table(&mut self) -> Result<BootstrapOutcome, LoaderError> {
        self.create_table_if_missing()
            .inspect_err(|e| tracing::error!("Error checking/creating table: {}", e))
    }

    fn begin(&mut self) -> Result<(), LoaderError> {
        self.transaction_statement("begin", "BEGIN")
    }

    fn commit(&mut self) -> Result<(), LoaderError> {
        self.transaction_statement("commit", "COMMIT")
    }

    fn rollback(&mut self) -> Result<(), LoaderError> {
        self.transaction_statement("rollback", "ROLLBACK")
    }

    fn order_exists(&mut self, order_id: &str) -> Result<bool, LoaderError> {
        let row = self
            .runtime
            .block_on(
                self.client
                    .query_opt(OrdersSchema::order_exists_postgres(), &[&order_id]),
            )
            .map_err(|e| LoaderError::row(order_id, e))?;
        Ok(row.is_some())
    }

    fn insert_order(&mut self, row: &OrderRow) -> Result<(), LoaderError> {
        self.runtime
            .block_on(self.client.execute(
                OrdersSchema::insert_order_postgres(),
                &[
                    &row.order_id,
                    &row.status,
                    &row.date,
                    &row.amount,
                    &row.customer_region,
                ],
            ))
            .map_err(|e| LoaderError::row(&row.order_id, e))?;
        Ok(())
    }

    fn fetch_order(&mut self, order_id: &str) -> Result<Option<OrderRow>, LoaderError> {
        let row = self
            .runtime
            .block_on(
                self.client
                    .query_opt(OrdersSchema::select_order_postgres(), &[&order_id]),
            )
            .map_err(|e| LoaderError::row(order_id, e))?;

        Ok(row.map(|r| OrderRow {
            order_id: r.get(0),
            status: r.get(1),
            date: r.get(2),
            amount: r.get(3),
            customer_region: r.get(4),
        }))
    }

    fn count_orders(&mut self) -> Result<i64, LoaderError> {
        let row = self
            .runtime
            .block_on(self.client.query_one(OrdersSchema::count_orders(), &[]))
            .map_err(|e| LoaderError::transaction("count", e))?;
        Ok(row.get(0))
    }
}
