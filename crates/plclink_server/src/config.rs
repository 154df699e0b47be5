//! TOML configuration for the plclink server
//!
//! Every key is optional. Environment variables override the file so that
//! container platforms that inject `PORT` work unchanged.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATABASE_PATH: &str = "plclink.sqlite3";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// TCP port to listen on
    pub port: u16,
    /// Interface to bind
    pub bind_address: IpAddr,
    /// SQLite database file, created on first start
    pub database_path: PathBuf,
    /// One of trace|debug|info|warn|error
    pub log_level: String,
    /// Absolute directory for rotated log files; stderr when unset
    pub log_dir: Option<String>,
    /// Install a permissive CORS layer
    pub cors_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            log_level: plclink_core::default_log_level().to_string(),
            log_dir: None,
            cors_enabled: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &str) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path, e))?;
        Self::from_toml_str(&content)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path, e))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Apply `PORT`, `PLCLINK_DATABASE_PATH`, `PLCLINK_LOG_LEVEL` and
    /// `PLCLINK_LOG_DIR` on top of the loaded values.
    ///
    /// `lookup` abstracts the environment so tests do not mutate process
    /// state.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| format!("Invalid PORT value '{}'", port))?;
        }
        if let Some(path) = lookup("PLCLINK_DATABASE_PATH") {
            self.database_path = PathBuf::from(path);
        }
        if let Some(level) = lookup("PLCLINK_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(dir) = lookup("PLCLINK_LOG_DIR") {
            self.log_dir = Some(dir);
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::{ServerConfig, DEFAULT_PORT};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = ServerConfig::from_toml_str("").unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.cors_enabled);
    }

    #[test]
    fn file_values_override_defaults() {
        let config = ServerConfig::from_toml_str(
            r#"
            port = 9000
            bind_address = "127.0.0.1"
            database_path = "/var/lib/plclink/reports.db"
            cors_enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:9000");
        assert_eq!(
            config.database_path,
            PathBuf::from("/var/lib/plclink/reports.db")
        );
        assert!(!config.cors_enabled);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ServerConfig::from_toml_str("prot = 1").is_err());
    }

    #[test]
    fn env_overrides_file() {
        let mut config = ServerConfig::from_toml_str("port = 9000").unwrap();
        config
            .apply_env_overrides(env(&[("PORT", "3000"), ("PLCLINK_LOG_LEVEL", "warn")]))
            .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn invalid_port_is_an_error() {
        let mut config = ServerConfig::default();
        let err = config
            .apply_env_overrides(env(&[("PORT", "eighty")]))
            .unwrap_err();
        assert!(err.contains("PORT"));
    }
}
