//! Server configuration.
//!
//! Read from a YAML file (`LAB_RESERVATION_CONFIG`, else `lab-reservation.yaml`
//! in the working directory). A missing file means defaults. The bind address
//! and data directory can be overridden from the environment.
//!
//! ```yaml
//! bind_address: 127.0.0.1:3000
//! data_directory: /var/lib/lab-reservation
//! allowed_origin: http://localhost:8080
//! log_level: info
//! default_room: Laboratory
//! session_ttl_hours: 12
//! bootstrap_admin:
//!   email: admin@example.com
//!   password: change-me
//! ```

use anyhow::{Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::domain::models::reservation::DEFAULT_ROOM;
use crate::backend::domain::sessions::DEFAULT_SESSION_TTL_HOURS;
use crate::backend::storage::CsvConnection;

pub const CONFIG_PATH_ENV: &str = "LAB_RESERVATION_CONFIG";
pub const BIND_ENV: &str = "LAB_RESERVATION_BIND";
pub const DATA_DIR_ENV: &str = "LAB_RESERVATION_DATA_DIR";
pub const DEFAULT_CONFIG_FILE: &str = "lab-reservation.yaml";

/// Administrator account created on startup when no account has its email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    /// Defaults to the platform data directory
    pub data_directory: Option<PathBuf>,
    /// Origin allowed by CORS; `*` allows any
    pub allowed_origin: String,
    /// Used when `RUST_LOG` is not set
    pub log_level: String,
    pub default_room: String,
    /// Hours a sign-in stays valid
    pub session_ttl_hours: i64,
    /// Built frontend served for non-API paths
    pub static_directory: Option<PathBuf>,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            data_directory: None,
            allowed_origin: "http://localhost:8080".to_string(),
            log_level: "info".to_string(),
            default_room: DEFAULT_ROOM.to_string(),
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            static_directory: None,
            bootstrap_admin: None,
        }
    }
}

impl ServerConfig {
    /// Load from the configured path and apply environment overrides
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup(BIND_ENV).filter(|v| !v.trim().is_empty()) {
            self.bind_address = bind;
        }
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            self.data_directory = Some(PathBuf::from(dir));
        }
    }

    /// Session lifetime, at least one hour
    pub fn session_ttl(&self) -> Duration {
        Duration::hours(self.session_ttl_hours.max(1))
    }

    /// Configured data directory, or the platform default
    pub fn resolve_data_directory(&self) -> Result<PathBuf> {
        match &self.data_directory {
            Some(dir) => Ok(dir.clone()),
            None => CsvConnection::default_directory(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ServerConfig::from_file(&temp_dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.default_room, "Laboratory");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lab.yaml");
        fs::write(
            &path,
            "bind_address: 0.0.0.0:8000\nbootstrap_admin:\n  email: root@example.com\n  password: secret\n",
        )
        .unwrap();

        let config = ServerConfig::from_file(&path).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8000");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.session_ttl(), Duration::hours(DEFAULT_SESSION_TTL_HOURS));
        assert_eq!(config.bootstrap_admin.unwrap().email, "root@example.com");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lab.yaml");
        fs::write(&path, "bind_address: [unclosed").unwrap();

        assert!(ServerConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_session_ttl_has_a_floor() {
        let config = ServerConfig {
            session_ttl_hours: 0,
            ..ServerConfig::default()
        };
        assert_eq!(config.session_ttl(), Duration::hours(1));
    }

    #[test]
    fn test_environment_overrides() {
        let mut config = ServerConfig::default();
        config.apply_overrides(|key| match key {
            BIND_ENV => Some("0.0.0.0:9000".to_string()),
            DATA_DIR_ENV => Some("/tmp/lab-data".to_string()),
            _ => None,
        });

        assert_eq!(config.bind_address, "0.0.0.0:9000");
        assert_eq!(config.resolve_data_directory().unwrap(), PathBuf::from("/tmp/lab-data"));
    }
}
