//! # launchkit-core
//!
//! Core library for the LaunchKit CLI providing:
//! - The action vocabulary (verbs, resource kinds, execution modes)
//! - Configuration file parsing (~/.launchkit/config.yaml)
//! - Shared error types

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use config::LaunchkitConfig;
pub use error::{Error, Result};
pub use types::{ActionVerb, ExecutionMode, ResourceKind};
pub use utils::get_home_dir;
