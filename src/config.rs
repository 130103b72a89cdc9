//! Configuration for the order loader
//!
//! Values come from an optional TOML file and are then overridden by the
//! `DB_*` variables, read from the process environment first and from a
//! `.env` file second. Every field has a local-development default, so running
//! with no file and no environment targets `postgres@localhost:5432`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::LoaderError;

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "order-loader.toml";

/// Credentials file picked up from the working directory
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Database engine to load into
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// PostgreSQL server (default)
    #[default]
    Postgres,
    /// Embedded DuckDB database file
    DuckDb,
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Backend::Postgres),
            "duckdb" => Ok(Backend::DuckDb),
            _ => Err(format!("Invalid backend: {}. Expected: postgres, duckdb", s)),
        }
    }
}

/// Connection settings for the target database
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: Backend,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    /// Database that receives the `orders` table
    pub name: String,
    /// Database used for the first PostgreSQL session, before the target exists
    pub maintenance_database: String,
    /// Database file when `backend = "duckdb"`
    pub duckdb_path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Postgres,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            host: "localhost".to_string(),
            port: 5432,
            name: "ozon_orders".to_string(),
            maintenance_database: "postgres".to_string(),
            duckdb_path: PathBuf::from("ozon_orders.duckdb"),
        }
    }
}

impl DatabaseConfig {
    /// Human-readable target for logs and errors (never includes the password)
    pub fn target(&self) -> String {
        match self.backend {
            Backend::Postgres => {
                format!("{}@{}:{}/{}", self.user, self.host, self.port, self.name)
            }
            Backend::DuckDb => format!("duckdb:{}", self.duckdb_path.display()),
        }
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("backend", &self.backend)
            .field("user", &self.user)
            .field("password", &redact_secret(&self.password))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("maintenance_database", &self.maintenance_database)
            .field("duckdb_path", &self.duckdb_path)
            .finish()
    }
}

/// Redact a secret for display
pub fn redact_secret(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        "[REDACTED]".to_string()
    }
}

/// Where and how much to log
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub file_name: String,
    /// Level or `EnvFilter` directive, e.g. `info` or `order_loader=debug`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            file_name: "order_loader.log".to_string(),
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn file_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

/// Variables read from a dotenv file.
///
/// The file is optional. Its values never override variables that are set
/// in the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvFile {
    path: PathBuf,
    vars: Option<HashMap<String, String>>,
}

impl EnvFile {
    /// Read `KEY=value` lines from `path`; a missing file is not an error
    pub fn read(path: &Path) -> Result<Self, LoaderError> {
        let vars = match dotenvy::from_path_iter(path) {
            Ok(iter) => Some(
                iter.collect::<Result<HashMap<_, _>, _>>()
                    .map_err(|e| LoaderError::Config(format!("{}: {}", path.display(), e)))?,
            ),
            Err(e) if e.not_found() => None,
            Err(e) => {
                return Err(LoaderError::Config(format!(
                    "cannot read {}: {}",
                    path.display(),
                    e
                )));
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            vars,
        })
    }

    /// Whether the file existed and was read
    pub fn is_loaded(&self) -> bool {
        self.vars.is_some()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.vars.as_ref()?.get(key).cloned()
    }

    /// Report whether credentials came from the file.
    ///
    /// Called after logging is installed, since the file is read before.
    pub fn log_status(&self) {
        if self.is_loaded() {
            tracing::info!("Database credentials was loaded from {}", self.path.display());
        } else {
            tracing::error!("{} file not found.", self.path.display());
        }
    }
}

/// Full loader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    /// JSON export to load
    pub input_path: PathBuf,
    /// Log a progress line every N inserted records
    pub progress_interval: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            input_path: PathBuf::from(crate::DEFAULT_INPUT_FILE),
            progress_interval: 1,
        }
    }
}

impl LoaderConfig {
    /// Load config from a file (explicit path, then `order-loader.toml`), or use
    /// defaults; then apply the process environment, falling back to `env_file`.
    pub fn load(path: Option<&Path>, env_file: &EnvFile) -> Result<Self, LoaderError> {
        let mut config = match path {
            Some(config_path) => Self::from_file(config_path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    LoaderConfig::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok().or_else(|| env_file.get(key)))?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self, LoaderError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LoaderError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
            .map_err(|e| LoaderError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse TOML text
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Override settings from environment variables.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map so they
    /// never touch the process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), LoaderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(user) = lookup("DB_USER") {
            self.database.user = user;
        }
        if let Some(password) = lookup("DB_PASSWORD") {
            self.database.password = password;
        }
        if let Some(host) = lookup("DB_HOST") {
            self.database.host = host;
        }
        if let Some(port) = lookup("DB_PORT") {
            self.database.port = port
                .trim()
                .parse()
                .map_err(|_| {
                    LoaderError::Config(format!("DB_PORT is not a port number: {port}"))
                })?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_target_local_postgres() {
        let config = LoaderConfig::default();
        assert_eq!(config.database.backend, Backend::Postgres);
        assert_eq!(config.database.target(), "postgres@localhost:5432/ozon_orders");
        assert_eq!(config.input_path, PathBuf::from("ozon_orders.json"));
        assert_eq!(config.logging.file_path(), PathBuf::from("logs/order_loader.log"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = LoaderConfig::default();
        config
            .apply_env(env(&[
                ("DB_USER", "loader"),
                ("DB_PASSWORD", "s3cret"),
                ("DB_HOST", "db.internal"),
                ("DB_PORT", "6543"),
                ("LOG_LEVEL", "DEBUG"),
            ]))
            .unwrap();

        assert_eq!(config.database.user, "loader");
        assert_eq!(config.database.password, "s3cret");
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let mut config = LoaderConfig::default();
        let err = config.apply_env(env(&[("DB_PORT", "five")])).unwrap_err();
        assert!(matches!(err, LoaderError::Config(_)));
        assert_eq!(config.database.port, 5432);
    }

    #[test]
    fn test_toml_partial_file() {
        let config = LoaderConfig::from_toml(
            r#"
            progress_interval = 5

            [database]
            backend = "duckdb"
            duckdb_path = "/tmp/orders.duckdb"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.backend, Backend::DuckDb);
        assert_eq!(config.database.duckdb_path, PathBuf::from("/tmp/orders.duckdb"));
        assert_eq!(config.database.user, "postgres");
        assert_eq!(config.progress_interval, 5);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_password_never_in_debug() {
        let mut config = DatabaseConfig::default();
        config.password = "hunter2".to_string();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!config.target().contains("hunter2"));
    }

    #[test]
    fn test_env_file_supplies_credentials() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(
            &path,
            "# local credentials\nDB_USER=loader\nDB_PASSWORD=\"from file\"\nDB_PORT=6543\n",
        )
        .unwrap();

        let env_file = EnvFile::read(&path).unwrap();
        assert!(env_file.is_loaded());
        assert_eq!(env_file.get("DB_PASSWORD").as_deref(), Some("from file"));
        assert_eq!(env_file.get("DB_HOST"), None);

        let process = env(&[("DB_USER", "from_process")]);
        let mut config = LoaderConfig::default();
        config
            .apply_env(|key| process(key).or_else(|| env_file.get(key)))
            .unwrap();

        assert_eq!(config.database.user, "from_process");
        assert_eq!(config.database.password, "from file");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.database.host, "localhost");
    }

    #[test]
    fn test_missing_env_file_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let env_file = EnvFile::read(&dir.path().join(".env")).unwrap();
        assert!(!env_file.is_loaded());
        assert_eq!(env_file.get("DB_USER"), None);
    }

    #[test]
    fn test_malformed_env_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "DB_USER='unterminated\n").unwrap();
        let err = EnvFile::read(&path).unwrap_err();
        assert!(matches!(err, LoaderError::Config(_)));
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("postgres".parse::<Backend>().unwrap(), Backend::Postgres);
        assert_eq!("DuckDB".parse::<Backend>().unwrap(), Backend::DuckDb);
        assert!("mysql".parse::<Backend>().is_err());
    }
}
