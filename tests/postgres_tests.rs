//! Integration tests against a live PostgreSQL server
//!
//! Ignored by default. Run with a local server:
//!
//! ```text
//! DB_HOST=localhost DB_PORT=5432 DB_USER=postgres DB_PASSWORD=postgres \
//!     cargo test --test postgres_tests -- --ignored --test-threads=1
//! ```
//!
//! Each test uses its own database name so runs do not interfere.

#![cfg(feature = "postgres-backend")]

use std::fs;
use tempfile::TempDir;

use order_loader::pipeline::run;
use order_loader::{Backend, BootstrapOutcome, LoaderConfig, OrderStore, PostgresStore};

fn config_for(database: &str, dir: &TempDir, json: &str) -> LoaderConfig {
    let input = dir.path().join("ozon_orders.json");
    fs::write(&input, json).expect("Failed to write input file");

    let mut config = LoaderConfig::default();
    config
        .apply_env(|key| std::env::var(key).ok())
        .expect("Invalid DB_* environment");
    config.database.backend = Backend::Postgres;
    config.database.name = format!("{}_{}", database, std::process::id());
    config.input_path = input;
    config
}

#[test]
#[ignore = "requires a running PostgreSQL server"]
fn test_postgres_bootstrap_and_idempotent_load() {
    let dir = TempDir::new().unwrap();
    let config = config_for(
        "order_loader_it",
        &dir,
        r#"[{"order_id":"A1","status":"paid","date":"01.02.2024","amount":99.5,"customer":{"region":"MSK"}}]"#,
    );

    let first = run(&config).expect("First run failed");
    assert_eq!(first.processed_count, 1);
    assert_eq!(first.skipped_duplicates, 0);

    let second = run(&config).expect("Second run failed");
    assert_eq!(second.processed_count, 0);
    assert_eq!(second.skipped_duplicates, 1);

    let mut store = PostgresStore::connect(&config.database).unwrap();
    assert_eq!(
        store.ensure_database().unwrap(),
        BootstrapOutcome::AlreadyExists
    );
    assert_eq!(store.current_database(), config.database.name);
    assert_eq!(store.ensure_table().unwrap(), BootstrapOutcome::AlreadyExists);

    let row = store.fetch_order("A1").unwrap().unwrap();
    assert_eq!(row.date.as_deref(), Some("2024-02-01"));
    assert_eq!(row.amount, Some(99.5));
    assert_eq!(row.customer_region.as_deref(), Some("MSK"));
    assert_eq!(store.count_orders().unwrap(), 1);
}

#[test]
#[ignore = "requires a running PostgreSQL server"]
fn test_postgres_rollback_on_bad_record() {
    let dir = TempDir::new().unwrap();
    let config = config_for(
        "order_loader_rb",
        &dir,
        r#"[{"order_id":"R1"},{"status":"no id"}]"#,
    );

    assert!(run(&config).is_err());

    let mut store = PostgresStore::connect(&config.database).unwrap();
    store.ensure_database().unwrap();
    store.ensure_table().unwrap();
    assert_eq!(store.count_orders().unwrap(), 0);
}

#[test]
#[ignore = "requires a running PostgreSQL server"]
fn test_postgres_bad_credentials() {
    let dir = TempDir::new().unwrap();
    let mut config = config_for("order_loader_auth", &dir, "[]");
    config.database.password = "definitely-not-the-password".to_string();

    let err = PostgresStore::connect(&config.database).err().unwrap();
    assert!(matches!(err, order_loader::LoaderError::Connection { .. }));
}
