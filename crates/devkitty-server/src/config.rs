//! Server configuration
//!
//! Read once at startup from `DEVKITTY_*` environment variables (after an
//! optional `.env` file). Legacy `DATABASE_URL` / `DB_STRING` variables are
//! appended to the candidate list so the resolver only ever sees one ordered
//! list.

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

const ENV_PREFIX: &str = "DEVKITTY";

/// Connection-string variables honored after the explicit candidates
const LEGACY_DATABASE_VARS: &[&str] = &["DATABASE_URL", "DB_STRING"];

const DEFAULT_PORT: &str = "3000";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    #[serde(default)]
    pub database_urls: Vec<String>,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}

impl ServerConfig {
    /// Load from the process environment
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            info!("Loaded environment from {}", path.display());
        }

        Self::from_vars(std::env::vars().collect())
    }

    /// Load from an explicit variable map
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        let port = vars
            .get("PORT")
            .map(|p| p.trim().to_string())
            .unwrap_or_else(|| DEFAULT_PORT.to_string());

        let mut config: ServerConfig = Config::builder()
            .set_default("bind_address", format!("0.0.0.0:{}", port))?
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("database_urls")
                    .source(Some(vars.clone())),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        config.database_urls.extend(
            LEGACY_DATABASE_VARS
                .iter()
                .filter_map(|name| vars.get(*name))
                .cloned(),
        );

        Ok(config)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Hosted deployments skip database certificate validation
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_vars(HashMap::new()).unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:3000");
        assert!(config.database_urls.is_empty());
        assert_eq!(config.connect_timeout(), Duration::from_secs(5));
        assert!(!config.is_production());
        assert_eq!(config.static_dir, PathBuf::from("public"));
    }

    #[test]
    fn test_port_sets_default_bind_address() {
        let config = ServerConfig::from_vars(vars(&[("PORT", "8080")])).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8080");

        let config = ServerConfig::from_vars(vars(&[
            ("PORT", "8080"),
            ("DEVKITTY_BIND_ADDRESS", "127.0.0.1:9000"),
        ]))
        .unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:9000");
    }

    #[test]
    fn test_candidates_keep_order_with_legacy_last() {
        let config = ServerConfig::from_vars(vars(&[
            ("DEVKITTY_DATABASE_URLS", "sqlite://data/devkitty.db,postgres://db/devkitty"),
            ("DB_STRING", "mongodb://127.0.0.1:27017/devkitty"),
            ("DATABASE_URL", "postgres://legacy/devkitty"),
        ]))
        .unwrap();

        assert_eq!(
            config.database_urls,
            vec![
                "sqlite://data/devkitty.db",
                "postgres://db/devkitty",
                "postgres://legacy/devkitty",
                "mongodb://127.0.0.1:27017/devkitty",
            ]
        );
    }

    #[test]
    fn test_environment_and_timeout() {
        let config = ServerConfig::from_vars(vars(&[
            ("DEVKITTY_ENVIRONMENT", "Production"),
            ("DEVKITTY_CONNECT_TIMEOUT_MS", "250"),
        ]))
        .unwrap();

        assert!(config.is_production());
        assert_eq!(config.connect_timeout(), Duration::from_millis(250));
    }
}
