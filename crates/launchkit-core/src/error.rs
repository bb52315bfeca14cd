//! Error types for launchkit-core

use thiserror::Error;

/// Result type alias using launchkit-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for LaunchKit
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {message}")]
    InvalidConfig { message: String },

    /// Unknown action verb
    #[error("Unknown action: {verb}. Valid actions: {available}")]
    UnknownVerb { verb: String, available: String },

    /// Unknown resource kind
    #[error("Unknown resource kind: {kind}. Valid kinds: {available}")]
    UnknownResourceKind { kind: String, available: String },

    /// Unknown execution mode
    #[error("Unknown execution mode: {mode}. Valid modes: execute, explain")]
    UnknownMode { mode: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an unknown verb error
    pub fn unknown_verb(verb: impl Into<String>, available: impl Into<String>) -> Self {
        Self::UnknownVerb {
            verb: verb.into(),
            available: available.into(),
        }
    }

    /// Create an unknown resource kind error
    pub fn unknown_resource_kind(kind: impl Into<String>, available: impl Into<String>) -> Self {
        Self::UnknownResourceKind {
            kind: kind.into(),
            available: available.into(),
        }
    }
}
