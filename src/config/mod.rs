//! Application configuration

pub mod client;

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use client::{ClientConfig, ConfigError};

const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub backend_url: String,
    pub client: ClientConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let client = match env::var("QAT_CONFIG") {
            Ok(path) => ClientConfig::from_file(&PathBuf::from(path))?,
            Err(_) => ClientConfig::default(),
        };

        Ok(Self::resolve(
            env::var("HOST").ok(),
            env::var("PORT").ok(),
            env::var("QAT_BACKEND_URL").ok(),
            client,
        ))
    }

    /// Environment values win over the file, the file over built-in defaults
    fn resolve(
        host: Option<String>,
        port: Option<String>,
        backend_url: Option<String>,
        client: ClientConfig,
    ) -> Self {
        let backend_url = backend_url
            .or_else(|| client.backend.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.into());

        Self {
            host: host.unwrap_or_else(|| "127.0.0.1".into()),
            port: port.and_then(|p| p.parse().ok()).unwrap_or(3000),
            backend_url,
            client,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::resolve(None, None, None, ClientConfig::default());

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.backend_url, "http://localhost:8000");
    }

    #[test]
    fn test_env_overrides_file() {
        let client = ClientConfig::from_str("[backend]\nbase_url = \"http://file:8000\"").unwrap();

        let from_file = Config::resolve(None, Some("bogus".into()), None, client.clone());
        assert_eq!(from_file.backend_url, "http://file:8000");
        assert_eq!(from_file.port, 3000);

        let from_env = Config::resolve(
            Some("0.0.0.0".into()),
            Some("8080".into()),
            Some("http://env:9000".into()),
            client,
        );
        assert_eq!(from_env.backend_url, "http://env:9000");
        assert_eq!(from_env.host, "0.0.0.0");
        assert_eq!(from_env.port, 8080);
    }
}
