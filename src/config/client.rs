//! Optional TOML configuration
//!
//! ```toml
//! [backend]
//! base_url = "http://localhost:8000"
//!
//! [upload]
//! accepted_extensions = ["txt", "pdf", "feature"]
//! # Largest accepted multipart body on the file route, in bytes (default 25 MiB)
//! max_file_bytes = 26214400
//!
//! [selenium]
//! languages = ["python"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::backend::DEFAULT_LANGUAGE;

/// Root client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub upload: UploadConfig,

    #[serde(default)]
    pub selenium: SeleniumConfig,
}

impl ClientConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.backend.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Validation(format!(
                    "backend.base_url must be an http(s) URL, got '{}'",
                    url
                )));
            }
        }
        if self.selenium.languages.is_empty() {
            return Err(ConfigError::Validation(
                "selenium.languages must list at least one language".into(),
            ));
        }
        if self.upload.max_file_bytes == 0 {
            return Err(ConfigError::Validation(
                "upload.max_file_bytes must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Generation backend location
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Used when `QAT_BACKEND_URL` is not set
    #[serde(default)]
    pub base_url: Option<String>,
}

/// File upload settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Extensions (without the dot) accepted on the file route
    #[serde(default = "default_extensions")]
    pub accepted_extensions: Vec<String>,

    /// Body limit for the multipart file route, in bytes
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,
}

fn default_max_file_bytes() -> usize {
    25 * 1024 * 1024
}

fn default_extensions() -> Vec<String> {
    [
        "txt", "pdf", "docx", "feature", "py", "js", "jsx", "ts", "tsx", "html", "css",
    ]
    .iter()
    .map(|ext| ext.to_string())
    .collect()
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            accepted_extensions: default_extensions(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

impl UploadConfig {
    pub fn accepts(&self, file_name: &str) -> bool {
        let Some((_, extension)) = file_name.rsplit_once('.') else {
            return false;
        };
        self.accepted_extensions
            .iter()
            .any(|accepted| accepted.trim_start_matches('.').eq_ignore_ascii_case(extension))
    }
}

/// Selenium generator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeleniumConfig {
    /// Languages offered as tasks
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
}

fn default_languages() -> Vec<String> {
    vec![DEFAULT_LANGUAGE.to_string()]
}

impl Default for SeleniumConfig {
    fn default() -> Self {
        Self {
            languages: default_languages(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}
