// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # hapnav configuration
//!
//! One immutable, validated [`HapnavConfig`] loaded from
//! `hapnav_configuration.toml` with environment and CLI overrides.
//!
//! ```rust,no_run
//! use hapnav_config::load_config;
//!
//! let config = load_config(None, None).expect("Failed to load config");
//! println!("Map: {}x{}", config.map.map_width, config.map.map_height);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{
    apply_cli_overrides, apply_environment_overrides, find_config_file, load_config,
    load_config_or_default,
};
pub use types::*;
pub use validation::{collect_validation_errors, validate_config, ConfigValidationError};

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax: {0}")]
    ParseError(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

impl HapnavConfig {
    /// Checks the value and hands it back, so a config is validated at
    /// construction.
    pub fn validated(self) -> ConfigResult<Self> {
        validate_config(&self)?;
        Ok(self)
    }

    /// Serializes to TOML, e.g. to write a starter configuration file.
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }
}
