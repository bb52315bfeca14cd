//! Built-in action handlers
//!
//! Each handler is a thin wrapper over one external tool (git, docker,
//! kubectl): it renders the command line for explain mode and spawns the
//! same command line on execute. Orchestration logic does not live here.

pub mod container;
pub mod deployment;
pub mod image;
pub mod project;

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Validate a project name slot
///
/// Names become directory names, container names, and deployment names,
/// so the character set is the strictest common denominator.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    let re = NAME_RE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9_-]*$").expect("valid regex"));

    if re.is_match(name) {
        Ok(())
    } else {
        Err(Error::validation(
            "name",
            format!("'{name}' must be lowercase alphanumeric with hyphens"),
        ))
    }
}
