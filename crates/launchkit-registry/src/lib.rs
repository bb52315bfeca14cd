//! # launchkit-registry
//!
//! Durable record of every project LaunchKit has created: the source of
//! truth for update, scale, build, deploy, and delete targets. One JSON
//! file keyed by project name, mutated only under an exclusive file lock
//! with atomic write-to-temp-then-rename persistence.

pub mod error;
pub mod store;
pub mod types;

pub use error::{Error, Result};
pub use store::ProjectStore;
pub use types::{LifecycleState, ProjectRecord, ResourceHandles};
