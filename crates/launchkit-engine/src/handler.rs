//! Action handler capability and the handler table
//!
//! Handlers are a small closed set of tagged capabilities keyed by
//! (verb, resource kind). The engine only ever sees the uniform
//! {validate, plan, execute} surface; what happens behind `execute` is an
//! external collaborator's business.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use launchkit_core::{ActionVerb, ResourceKind};
use tracing::debug;

use crate::error::{Error, Result};
use crate::handlers;
use crate::request::{ActionPlan, ActionRequest, HandlerOutcome};

/// Uniform capability implemented by every action handler
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Handler name for logs
    fn name(&self) -> &'static str;

    /// Check the request's slots before anything runs
    ///
    /// A failure here aborts the command with no side effects; range
    /// checks (e.g. non-negative replica counts) live here so they
    /// surface as validation errors, not handler failures.
    fn validate(&self, request: &ActionRequest) -> Result<()>;

    /// Describe what `execute` would do, including the equivalent
    /// lower-level command lines. Must not perform side effects.
    fn plan(&self, request: &ActionRequest) -> ActionPlan;

    /// Perform the action. May block on external processes.
    async fn execute(&self, request: &ActionRequest) -> Result<HandlerOutcome>;
}

/// The fixed dispatch table mapping (verb, kind) to a handler
pub struct HandlerSet {
    handlers: HashMap<(ActionVerb, ResourceKind), Box<dyn ActionHandler>>,
}

impl HandlerSet {
    /// Build an empty table
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Build the standard table over the given projects root directory
    pub fn standard(projects_root: PathBuf) -> Self {
        let mut set = Self::new();
        set.register(
            ActionVerb::Create,
            ResourceKind::Project,
            Box::new(handlers::project::CreateProject::new(projects_root.clone())),
        );
        set.register(
            ActionVerb::Update,
            ResourceKind::Project,
            Box::new(handlers::project::UpdateProject::new(projects_root.clone())),
        );
        set.register(
            ActionVerb::Delete,
            ResourceKind::Project,
            Box::new(handlers::project::DeleteProject::new(projects_root.clone())),
        );
        set.register(
            ActionVerb::Create,
            ResourceKind::Container,
            Box::new(handlers::container::CreateContainer),
        );
        set.register(
            ActionVerb::Delete,
            ResourceKind::Container,
            Box::new(handlers::container::DeleteContainer),
        );
        set.register(
            ActionVerb::Create,
            ResourceKind::Deployment,
            Box::new(handlers::deployment::CreateDeployment),
        );
        set.register(
            ActionVerb::Deploy,
            ResourceKind::Deployment,
            Box::new(handlers::deployment::DeployProject::new(projects_root.clone())),
        );
        set.register(
            ActionVerb::Scale,
            ResourceKind::Deployment,
            Box::new(handlers::deployment::ScaleDeployment),
        );
        set.register(
            ActionVerb::Delete,
            ResourceKind::Deployment,
            Box::new(handlers::deployment::DeleteDeployment),
        );
        set.register(
            ActionVerb::Build,
            ResourceKind::Image,
            Box::new(handlers::image::BuildImage::new(projects_root)),
        );
        set.register(
            ActionVerb::Delete,
            ResourceKind::Image,
            Box::new(handlers::image::DeleteImage),
        );
        set
    }

    /// Register a handler for a verb/kind pair
    pub fn register(
        &mut self,
        verb: ActionVerb,
        resource: ResourceKind,
        handler: Box<dyn ActionHandler>,
    ) {
        self.handlers.insert((verb, resource), handler);
    }

    /// Look up the handler for a request
    pub fn get(&self, verb: ActionVerb, resource: ResourceKind) -> Result<&dyn ActionHandler> {
        self.handlers
            .get(&(verb, resource))
            .map(|h| h.as_ref())
            .ok_or_else(|| Error::unsupported(verb, resource))
    }
}

impl Default for HandlerSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Fail unless the external tool is installed
pub(crate) fn ensure_tool(tool: &str) -> Result<()> {
    which::which(tool).map_err(|_| Error::tool_missing(tool))?;
    Ok(())
}

/// Run an external command, mapping a nonzero exit to a handler failure
/// carrying the tool's stderr
pub(crate) async fn run_tool(program: &str, args: &[String]) -> Result<String> {
    debug!(program, ?args, "running external command");

    let output = tokio::process::Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| Error::handler_failure(format!("failed to start {program}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::handler_failure(format!(
            "{program} exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Render command parts for plan output
pub(crate) fn cmd(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // The trait must stay object-safe; the table stores boxed handlers
    fn _assert_object_safe(_: &dyn ActionHandler) {}

    #[test]
    fn test_standard_table_covers_grammar_actions() {
        let set = HandlerSet::standard(PathBuf::from("/tmp/projects"));
        for (verb, kind) in [
            (ActionVerb::Create, ResourceKind::Project),
            (ActionVerb::Update, ResourceKind::Project),
            (ActionVerb::Delete, ResourceKind::Project),
            (ActionVerb::Create, ResourceKind::Container),
            (ActionVerb::Delete, ResourceKind::Container),
            (ActionVerb::Create, ResourceKind::Deployment),
            (ActionVerb::Deploy, ResourceKind::Deployment),
            (ActionVerb::Scale, ResourceKind::Deployment),
            (ActionVerb::Delete, ResourceKind::Deployment),
            (ActionVerb::Build, ResourceKind::Image),
            (ActionVerb::Delete, ResourceKind::Image),
        ] {
            assert!(set.get(verb, kind).is_ok(), "missing handler for {verb} {kind}");
        }
    }

    #[test]
    fn test_unknown_pair_is_unsupported() {
        let set = HandlerSet::standard(PathBuf::from("/tmp/projects"));
        assert!(matches!(
            set.get(ActionVerb::Scale, ResourceKind::Image),
            Err(Error::UnsupportedAction { .. })
        ));
    }
}
