/// Configuration management for the budget server
///
/// Handles server binding, database location and static asset paths.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Directory served under /static (detail page script)
    pub static_dir: String,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
}

/// SQLite database location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Directory holding the database file (default: "data")
    pub data_dir: String,
    /// Database file name inside `data_dir` (default: "budget.db")
    pub database_file: String,
}

impl DatabaseConfig {
    /// Full path of the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.database_file)
    }
}

impl Config {
    /// Build the configuration from a variable lookup, falling back to defaults
    ///
    /// An unparsable port falls back to 8000.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        Self {
            server: ServerConfig {
                host: var("BUDGET_HOST", "0.0.0.0"),
                port: var("BUDGET_PORT", "8000").parse().unwrap_or(8000),
            },
            database: DatabaseConfig {
                data_dir: var("BUDGET_DATA_DIR", "data"),
                database_file: var("BUDGET_DATABASE_FILE", "budget.db"),
            },
            static_dir: var("BUDGET_STATIC_DIR", "static"),
        }
    }
}

impl Default for Config {
    /// Default configuration with ENV_VAR overrides for container deployment
    fn default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_without_variables() {
        let config = config_from(&[]);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.database_path(), PathBuf::from("data/budget.db"));
        assert_eq!(config.static_dir, "static");
    }

    #[test]
    fn variables_override_defaults() {
        let config = config_from(&[
            ("BUDGET_HOST", "127.0.0.1"),
            ("BUDGET_PORT", "9090"),
            ("BUDGET_DATA_DIR", "/var/lib/budget"),
            ("BUDGET_DATABASE_FILE", "prod.db"),
            ("BUDGET_STATIC_DIR", "/srv/static"),
        ]);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.database_path(), PathBuf::from("/var/lib/budget/prod.db"));
        assert_eq!(config.static_dir, "/srv/static");
    }

    #[test]
    fn invalid_port_falls_back_to_default() {
        assert_eq!(config_from(&[("BUDGET_PORT", "eighty")]).server.port, 8000);
        assert_eq!(config_from(&[("BUDGET_PORT", "70000")]).server.port, 8000);
    }

    #[test]
    fn database_path_joins_dir_and_file() {
        let config = DatabaseConfig {
            data_dir: "var/budget".to_string(),
            database_file: "projects.db".to_string(),
        };
        assert_eq!(config.database_path(), PathBuf::from("var/budget/projects.db"));
    }
}
