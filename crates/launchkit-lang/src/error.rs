//! Error types for launchkit-lang

use thiserror::Error;

/// Result type alias using launchkit-lang's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Grammar loading and validation error types
#[derive(Error, Debug)]
pub enum Error {
    /// Grammar file not found
    #[error("Grammar file not found: {path}")]
    GrammarNotFound { path: String },

    /// Pattern references a slot with no matching spec
    #[error("Pattern '{pattern}' references undeclared slot <{slot}>")]
    UnknownSlotRef { pattern: String, slot: String },

    /// Pattern contains no elements
    #[error("Grammar rule {index} has an empty pattern")]
    EmptyPattern { index: usize },

    /// Grammar table contains no rules
    #[error("Grammar table contains no rules")]
    EmptyTable,

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a grammar not found error
    pub fn grammar_not_found(path: impl Into<String>) -> Self {
        Self::GrammarNotFound { path: path.into() }
    }

    /// Create an unknown slot reference error
    pub fn unknown_slot_ref(pattern: impl Into<String>, slot: impl Into<String>) -> Self {
        Self::UnknownSlotRef {
            pattern: pattern.into(),
            slot: slot.into(),
        }
    }
}
