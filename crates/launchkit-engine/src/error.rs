//! Error types for launchkit-engine
//!
//! This is the user-facing taxonomy: everything except `Registry`
//! corruption terminates only the current command and leaves the session
//! usable.

use thiserror::Error;

/// Result type alias using launchkit-engine's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Engine error types
#[derive(Error, Debug)]
pub enum Error {
    /// No grammar entry matched the input
    #[error("Unrecognized command: '{input}'. Try 'help' for examples")]
    UnrecognizedCommand { input: String },

    /// Multiple registry matches and no selection was made
    #[error("Ambiguous target: matches {}", names.join(", "))]
    AmbiguousTarget { names: Vec<String> },

    /// The registry has no match for the requested target
    #[error("No project matches '{name}' in the registry")]
    NoSuchTarget { name: String },

    /// A slot failed its type or range check
    #[error("Invalid value for <{slot}>: {message}")]
    Validation { slot: String, message: String },

    /// No handler is registered for this verb/resource pair
    #[error("No handler for action: {verb} {resource}")]
    UnsupportedAction { verb: String, resource: String },

    /// An external tool required by the handler is not installed
    #[error("Required command not found: {tool}. Please ensure it is installed and in PATH")]
    ToolMissing { tool: String },

    /// The external action failed
    #[error("Action failed: {message}")]
    HandlerFailure { message: String },

    /// Registry error (duplicate, not found, corruption, lock)
    #[error(transparent)]
    Registry(#[from] launchkit_registry::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an unrecognized command error
    pub fn unrecognized(input: impl Into<String>) -> Self {
        Self::UnrecognizedCommand {
            input: input.into(),
        }
    }

    /// Create a no-such-target error
    pub fn no_such_target(name: impl Into<String>) -> Self {
        Self::NoSuchTarget { name: name.into() }
    }

    /// Create a validation error naming the offending slot
    pub fn validation(slot: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            slot: slot.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported action error
    pub fn unsupported(verb: impl std::fmt::Display, resource: impl std::fmt::Display) -> Self {
        Self::UnsupportedAction {
            verb: verb.to_string(),
            resource: resource.to_string(),
        }
    }

    /// Create a tool missing error
    pub fn tool_missing(tool: impl Into<String>) -> Self {
        Self::ToolMissing { tool: tool.into() }
    }

    /// Create a handler failure error
    pub fn handler_failure(message: impl Into<String>) -> Self {
        Self::HandlerFailure {
            message: message.into(),
        }
    }

    /// Whether the whole session must stop (registry unreadable)
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Registry(launchkit_registry::Error::Corrupt { .. }))
    }
}
