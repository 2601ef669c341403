//! # Configuration Modules
//!
//! Layered client configuration: defaults, JSON file, then environment and
//! command-line overrides supplied by the binary.

/// Client settings and their layering rules.
pub mod client_config;

pub use client_config::{default_credentials_path, ClientConfig, ConfigError, DEFAULT_CONFIG_FILE};
