//! Application configuration.
//!
//! Settings come from built-in defaults, then an optional YAML file, then
//! `BIRTHDAY_TRACKER_*` environment variables, each layer overriding the last.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "BIRTHDAY_TRACKER_CONFIG";

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "birthday_tracker.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub cors_allowed_origin: String,
    /// `tracing_subscriber::EnvFilter` directive used when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: "sqlite:birthdays.db".to_string(),
            cors_allowed_origin: "http://localhost:3000".to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the file and process environment
    pub fn load() -> Result<Self> {
        let explicit = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        let path = match explicit {
            Some(path) => Some(path),
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                local.exists().then_some(local)
            }
        };

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read a YAML config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply `BIRTHDAY_TRACKER_*` overrides looked up through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("BIRTHDAY_TRACKER_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("BIRTHDAY_TRACKER_PORT") {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid BIRTHDAY_TRACKER_PORT '{}'", port))?;
        }
        if let Some(url) = lookup("BIRTHDAY_TRACKER_DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(origin) = lookup("BIRTHDAY_TRACKER_CORS_ORIGIN") {
            self.cors_allowed_origin = origin;
        }
        if let Some(filter) = lookup("BIRTHDAY_TRACKER_LOG") {
            self.log_filter = filter;
        }
        Ok(())
    }

    /// `host:port` for binding the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.database_url, "sqlite:birthdays.db");
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_from_file_keeps_defaults_for_missing_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port: 9090\ndatabase_url: \"sqlite://data/events.db\"").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.database_url, "sqlite://data/events.db");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.cors_allowed_origin, "http://localhost:3000");
    }

    #[test]
    fn test_from_file_rejects_malformed_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port: not-a-number").unwrap();
        assert!(AppConfig::from_file(file.path()).is_err());

        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::from_file(&dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(lookup_from(&[
                ("BIRTHDAY_TRACKER_HOST", "0.0.0.0"),
                ("BIRTHDAY_TRACKER_PORT", "3001"),
                ("BIRTHDAY_TRACKER_LOG", "debug"),
            ]))
            .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:3001");
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.database_url, "sqlite:birthdays.db");
    }

    #[test]
    fn test_invalid_port_override_is_an_error() {
        let mut config = AppConfig::default();
        let err = config
            .apply_overrides(lookup_from(&[("BIRTHDAY_TRACKER_PORT", "eighty")]))
            .unwrap_err();
        assert!(err.to_string().contains("BIRTHDAY_TRACKER_PORT"));
    }
}
