use crate::core::{DboError, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Port used when the configuration does not name one.
pub const DEFAULT_PORT: u16 = 3306;

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
}

/// Connection settings for the database.
///
/// The bundled SQLite driver opens `database` as a file path (or `:memory:`).
/// The network fields are kept so the same file can describe a networked
/// backend; SQLite does not use them.
#[derive(Clone, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub host: String,
    pub database: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl DatabaseConfig {
    /// Creates a configuration with the default port.
    pub fn new(
        host: impl Into<String>,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        DatabaseConfig {
            host: host.into(),
            database: database.into(),
            username: username.into(),
            password: password.into(),
            port: DEFAULT_PORT,
        }
    }

    /// Configuration for a private in-memory database.
    pub fn in_memory() -> Self {
        DatabaseConfig::new("localhost", ":memory:", "", "")
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Renders a descriptor suitable for log lines. Credentials are never included.
    pub fn dsn(&self) -> String {
        format!(
            "sqlite:host={};dbname={};port={}",
            self.host, self.database, self.port
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(DboError::Config("database must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(DboError::Config("port must be non-zero".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("port", &self.port)
            .finish()
    }
}

/// Loads configuration from a TOML file at the given path.
///
/// # Example
///
/// ```no_run
/// let config = sqldbo::config::load_config("config.toml").expect("Failed to load config");
/// println!("{:?}", config);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| DboError::Config(format!("cannot read {}: {}", path.display(), e)))?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).map_err(|e| DboError::Config(e.to_string()))?;
    config.database.validate()?;
    Ok(config)
}

/// `<user config dir>/sqldbo/config.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sqldbo").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CONFIG: &str = r#"
[database]
host = "db.internal"
database = "/var/lib/app/app.db"
username = "app"
password = "hunter2"
port = 3307
"#;

    #[test]
    fn test_load_config_from_str() {
        let config = parse_config(SAMPLE_CONFIG).expect("Failed to parse sample config");
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.database, "/var/lib/app/app.db");
        assert_eq!(config.database.username, "app");
        assert_eq!(config.database.port, 3307);
    }

    #[test]
    fn test_port_defaults_to_3306() {
        let config = parse_config("[database]\ndatabase = \":memory:\"\n").unwrap();
        assert_eq!(config.database.port, 3306);
        assert_eq!(DatabaseConfig::in_memory().port, DEFAULT_PORT);
    }

    #[test]
    fn test_validation_rejects_empty_database() {
        let result = parse_config("[database]\ndatabase = \"  \"\n");
        assert!(matches!(result, Err(DboError::Config(_))));

        let zero_port = DatabaseConfig::in_memory().with_port(0);
        assert!(zero_port.validate().is_err());
    }

    #[test]
    fn test_credentials_never_rendered() {
        let config = parse_config(SAMPLE_CONFIG).unwrap().database;
        assert!(!format!("{:?}", config).contains("hunter2"));
        assert!(!config.dsn().contains("hunter2"));
        assert_eq!(config.dsn(), "sqlite:host=db.internal;dbname=/var/lib/app/app.db;port=3307");
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("/nonexistent/sqldbo/config.toml");
        assert!(matches!(result, Err(DboError::Config(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), SAMPLE_CONFIG).unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.database.password, "hunter2");
    }

    #[test]
    fn test_default_config_path_shape() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("sqldbo/config.toml"));
        }
    }
}
