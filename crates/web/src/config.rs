//! Server configuration from environment variables

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_DATASET: &str = "data/chess960_best_moves.json";
const DEFAULT_BIND: &str = "127.0.0.1:3000";
const DEFAULT_STATIC_DIR: &str = "crates/web/static";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidAddress { var: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct ExplorerConfig {
    /// JSON file holding the 960 analysed positions
    pub dataset_path: PathBuf,

    /// Address the HTTP server listens on
    pub bind_addr: SocketAddr,

    /// Directory served under /static
    pub static_dir: PathBuf,
}

impl ExplorerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let dataset_path = lookup("CHESS960_DATASET")
            .unwrap_or_else(|| DEFAULT_DATASET.to_string())
            .into();

        let bind = lookup("CHESS960_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind.parse().map_err(|_| ConfigError::InvalidAddress {
            var: "CHESS960_BIND",
            value: bind.clone(),
        })?;

        let static_dir = lookup("CHESS960_STATIC_DIR")
            .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string())
            .into();

        Ok(Self {
            dataset_path,
            bind_addr,
            static_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ExplorerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.dataset_path, PathBuf::from(DEFAULT_DATASET));
        assert_eq!(config.bind_addr.port(), 3000);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("CHESS960_DATASET", "/tmp/positions.json"),
            ("CHESS960_BIND", "0.0.0.0:8080"),
        ]
        .into_iter()
        .collect();
        let config = ExplorerConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.dataset_path, PathBuf::from("/tmp/positions.json"));
        assert_eq!(config.bind_addr.port(), 8080);
    }

    #[test]
    fn test_invalid_bind_address() {
        let result = ExplorerConfig::from_lookup(|k| (k == "CHESS960_BIND").then(|| "nowhere".to_string()));
        assert!(matches!(result, Err(ConfigError::InvalidAddress { .. })));
    }
}
