//! Error types for cmdline network configuration

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for network operations
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Errors raised while interpreting a single cmdline variable
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid interface name: {name}")]
    InvalidInterfaceName { name: String },

    #[error("Duplicate interface: {name}")]
    DuplicateInterface { name: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid configuration value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Unknown address method: {method}")]
    UnknownMethod { method: String },

    #[error("Address method '{method}' is not supported")]
    UnsupportedMethod { method: String },

    #[error("Interface {name} refers to itself")]
    SelfReference { name: String },

    #[error("Unable to derive a VLAN tag from interface name: {name}")]
    InvalidVlanTag { name: String },
}

/// Errors locating or reading a cmdline source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Source not available: {}", path.display())]
    Unavailable { path: PathBuf },

    #[error("Unable to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Shorthand for an invalid field value
    pub fn invalid_value(field: &str, value: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.into(),
        }
    }
}
