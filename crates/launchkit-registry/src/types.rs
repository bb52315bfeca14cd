//! Project record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a registered project
///
/// DELETED is represented by removal from the store rather than a
/// variant, so a name can be reused after a successful delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// Normal state; the project's resources are assumed live
    Active,
    /// A delete has been dispatched and has not finished
    Deleting,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Deleting => write!(f, "deleting"),
        }
    }
}

/// External resource handles owned by a project
///
/// Handle sets are appended to or cleared per class, never silently
/// overwritten, so no external resource is lost track of before cleanup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceHandles {
    /// Container names created for this project
    #[serde(default)]
    pub containers: Vec<String>,

    /// Orchestrator deployment names
    #[serde(default)]
    pub deployments: Vec<String>,

    /// Image tags built for this project
    #[serde(default)]
    pub images: Vec<String>,

    /// Remote repository URL, if one was created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    /// Current replica count of the project's deployment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i64>,
}

impl ResourceHandles {
    /// Append handles from another set, deduplicating; scalar fields take
    /// the newer value when present
    pub fn merge(&mut self, other: &ResourceHandles) {
        for c in &other.containers {
            if !self.containers.contains(c) {
                self.containers.push(c.clone());
            }
        }
        for d in &other.deployments {
            if !self.deployments.contains(d) {
                self.deployments.push(d.clone());
            }
        }
        for i in &other.images {
            if !self.images.contains(i) {
                self.images.push(i.clone());
            }
        }
        if other.repository.is_some() {
            self.repository = other.repository.clone();
        }
        if other.replicas.is_some() {
            self.replicas = other.replicas;
        }
    }

    /// Whether any handle is recorded
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
            && self.deployments.is_empty()
            && self.images.is_empty()
            && self.repository.is_none()
    }
}

/// A recorded failure, kept for retry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFailure {
    /// What failed, verbatim from the handler
    pub message: String,
    /// When it failed
    pub at: DateTime<Utc>,
}

/// One row per scaffolded project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Unique project name
    pub name: String,

    /// Stack identifier (e.g. "mern", "django")
    pub stack: String,

    /// Lifecycle state
    pub state: LifecycleState,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,

    /// External resource handles owned by this project
    #[serde(default)]
    pub handles: ResourceHandles,

    /// Last handler failure, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_failure: Option<RecordedFailure>,

    /// Action persisted before a mutating handler ran; a stale value at
    /// load time means the handler was interrupted mid-transition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_flight: Option<String>,
}

impl ProjectRecord {
    /// Create a fresh ACTIVE record
    pub fn new(name: impl Into<String>, stack: impl Into<String>, handles: ResourceHandles) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            stack: stack.into(),
            state: LifecycleState::Active,
            created_at: now,
            updated_at: now,
            handles,
            last_failure: None,
            in_flight: None,
        }
    }

    /// Whether a previous mutating action never finished
    pub fn was_interrupted(&self) -> bool {
        self.in_flight.is_some()
    }
}
