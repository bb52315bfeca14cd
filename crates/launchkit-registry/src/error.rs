//! Error types for launchkit-registry

use thiserror::Error;

/// Result type alias using launchkit-registry's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Registry error types
#[derive(Error, Debug)]
pub enum Error {
    /// An ACTIVE record already exists under this name
    #[error("Project '{name}' already exists in the registry")]
    DuplicateProject { name: String },

    /// No ACTIVE record matches this name
    #[error("Project not found in registry: {name}")]
    NotFound { name: String },

    /// The persisted store is unreadable; fatal for the session
    #[error("Registry file is corrupt ({path}): {message}")]
    Corrupt { path: String, message: String },

    /// Could not acquire the registry lock
    #[error("Failed to lock registry file: {0}")]
    Lock(std::io::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a duplicate project error
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateProject { name: name.into() }
    }

    /// Create a not found error
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create a corrupt store error
    pub fn corrupt(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.into(),
            message: message.into(),
        }
    }
}
