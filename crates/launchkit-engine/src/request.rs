//! Action request and outcome types

use launchkit_core::{ActionVerb, ExecutionMode, ResourceKind};
use launchkit_lang::SlotValues;
use launchkit_registry::{ProjectRecord, ResourceHandles};

use crate::error::{Error, Result};

/// The fully resolved unit of work passed to a handler
///
/// Created per user command and discarded after the handler returns.
#[derive(Debug, Clone)]
pub struct ActionRequest {
    /// Canonical verb
    pub verb: ActionVerb,

    /// Target resource kind
    pub resource: ResourceKind,

    /// Bound slot values
    pub slots: SlotValues,

    /// Target project record, when the action operates on an existing one
    pub target: Option<ProjectRecord>,

    /// Execution mode this request was resolved under
    pub mode: ExecutionMode,
}

impl ActionRequest {
    /// The project name this request operates on, from the target record
    /// or the bound name slot
    pub fn target_name(&self) -> Option<&str> {
        self.target
            .as_ref()
            .map(|r| r.name.as_str())
            .or_else(|| self.slots.get_str("name"))
    }

    /// Like `target_name`, but a missing name is a validation error
    pub fn require_name(&self) -> Result<&str> {
        self.target_name()
            .ok_or_else(|| Error::validation("name", "a project name is required"))
    }

    /// One-line description used in logs and explain output
    pub fn describe(&self) -> String {
        match self.target_name() {
            Some(name) => format!("{} {} '{}'", self.verb, self.resource, name),
            None => format!("{} {}", self.verb, self.resource),
        }
    }
}

/// What a handler would do: a human summary plus the equivalent
/// lower-level command lines, rendered in EXPLAIN mode
#[derive(Debug, Clone, PartialEq)]
pub struct ActionPlan {
    /// Human-readable summary
    pub summary: String,

    /// Equivalent shell command lines, in execution order
    pub commands: Vec<String>,
}

impl ActionPlan {
    /// Build a plan from a summary and tokenized command lines
    pub fn new(summary: impl Into<String>, commands: Vec<Vec<String>>) -> Self {
        Self {
            summary: summary.into(),
            commands: commands.iter().map(|c| c.join(" ")).collect(),
        }
    }
}

/// Result of a successful handler execution
#[derive(Debug, Clone, Default)]
pub struct HandlerOutcome {
    /// Message surfaced to the user
    pub message: String,

    /// Resource handles to record against the target project
    pub handles: ResourceHandles,
}

impl HandlerOutcome {
    /// Create an outcome with a message and no handles
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            handles: ResourceHandles::default(),
        }
    }

    /// Attach handles to the outcome
    pub fn with_handles(mut self, handles: ResourceHandles) -> Self {
        self.handles = handles;
        self
    }
}
