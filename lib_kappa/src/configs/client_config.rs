//! # Client Configuration
//!
//! Settings are layered, later layers winning field by field:
//! built-in defaults, then a JSON file, then an overlay (environment and
//! command-line values collected by the binary).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

#[cfg(feature = "retrieve")]
use crate::retrieve::GatewayConfig;
#[cfg(feature = "retrieve")]
use std::time::Duration;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "kappa.conf.json";

/// Backend origin used when no layer sets one.
pub const DEFAULT_BASE_URL: &str = "https://kappa-financial-advice-system-backend.onrender.com";

/// Request deadline in seconds used when no layer sets one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The config file is not valid JSON for this schema.
    #[error("Failed to parse config file {}: {source}", .path.display())]
    Json {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// `baseUrl` is not an absolute URL.
    #[error("Invalid base URL '{0}'")]
    InvalidUrl(String),
}

/// Client settings. Every field is optional so partial layers can be merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Backend origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Per-request deadline in seconds; `0` disables it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Send the stored token as a bearer header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attach_bearer: Option<bool>,
    /// JSON file holding the session token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_path: Option<PathBuf>,
    /// Log filter, e.g. `info` or `lib_kappa=debug`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    /// Emit logs as JSON lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_json: Option<bool>,
}

impl ClientConfig {
    /// The built-in bottom layer.
    pub fn defaults() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_string()),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            attach_bearer: Some(false),
            credentials_path: Some(default_credentials_path()),
            log_level: Some("info".to_string()),
            log_json: Some(false),
        }
    }

    /// Merges two layers, where `other` overrides `self` for `Some` values.
    pub fn merge(self, other: ClientConfig) -> ClientConfig {
        ClientConfig {
            base_url: other.base_url.or(self.base_url),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            attach_bearer: other.attach_bearer.or(self.attach_bearer),
            credentials_path: other.credentials_path.or(self.credentials_path),
            log_level: other.log_level.or(self.log_level),
            log_json: other.log_json.or(self.log_json),
        }
    }

    /// Reads one layer from a JSON file.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults, then the file layer, then `overlay`.
    ///
    /// With `file = None` the default file is used if it exists; an explicit
    /// path that does not exist is an error.
    pub fn load_layered(file: Option<&Path>, overlay: ClientConfig) -> Result<Self, ConfigError> {
        let mut config = Self::defaults();

        match file {
            Some(path) => {
                config = config.merge(Self::load_file(path)?);
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    config = config.merge(Self::load_file(path)?);
                }
            }
        }

        let config = config.merge(overlay);
        config.validate()?;
        Ok(config)
    }

    /// Checks that the base URL, if set, is absolute.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(base) = &self.base_url {
            Url::parse(base).map_err(|_| ConfigError::InvalidUrl(base.clone()))?;
        }
        Ok(())
    }

    /// Credentials file, falling back to the platform default.
    pub fn credentials_file(&self) -> PathBuf {
        self.credentials_path
            .clone()
            .unwrap_or_else(default_credentials_path)
    }

    /// Gateway settings derived from this configuration.
    #[cfg(feature = "retrieve")]
    pub fn gateway_config(&self) -> Result<GatewayConfig, ConfigError> {
        self.validate()?;
        let timeout = match self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Ok(GatewayConfig {
            base_url: self
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout,
            attach_bearer: self.attach_bearer.unwrap_or(false),
        })
    }
}

/// `<config dir>/kappa/credentials.json`, or `./kappa/credentials.json` when
/// the platform has no config directory.
pub fn default_credentials_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kappa")
        .join("credentials.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn later_layer_wins_field_by_field() {
        let file_layer = ClientConfig {
            base_url: Some("http://file.example".into()),
            timeout_secs: Some(5),
            ..Default::default()
        };
        let cli_layer = ClientConfig {
            timeout_secs: Some(9),
            ..Default::default()
        };

        let merged = ClientConfig::defaults().merge(file_layer).merge(cli_layer);
        assert_eq!(merged.base_url.as_deref(), Some("http://file.example"));
        assert_eq!(merged.timeout_secs, Some(9));
        assert_eq!(merged.attach_bearer, Some(false));
        assert_eq!(merged.log_level.as_deref(), Some("info"));
    }

    #[test]
    fn file_layer_is_camel_case_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kappa.conf.json");
        fs::write(&path, r#"{"baseUrl":"http://127.0.0.1:8000","attachBearer":true}"#).unwrap();

        let config = ClientConfig::load_layered(Some(&path), ClientConfig::default()).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://127.0.0.1:8000"));
        assert_eq!(config.attach_bearer, Some(true));
        assert_eq!(config.timeout_secs, Some(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = ClientConfig::load_layered(Some(&dir.path().join("nope.json")), ClientConfig::default());
        assert!(matches!(err, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{").unwrap();
        assert!(matches!(ClientConfig::load_file(&path), Err(ConfigError::Json { .. })));
    }

    #[test]
    fn relative_base_url_is_rejected() {
        let overlay = ClientConfig {
            base_url: Some("/just/a/path".into()),
            ..Default::default()
        };
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.json");
        fs::write(&path, "{}").unwrap();
        assert!(matches!(
            ClientConfig::load_layered(Some(&path), overlay),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[cfg(feature = "retrieve")]
    #[test]
    fn zero_timeout_disables_the_deadline() {
        let config = ClientConfig {
            timeout_secs: Some(0),
            ..ClientConfig::defaults()
        };
        let gateway = config.gateway_config().unwrap();
        assert_eq!(gateway.timeout, None);
        assert_eq!(gateway.base_url, DEFAULT_BASE_URL);
        assert!(!gateway.attach_bearer);
    }
}
