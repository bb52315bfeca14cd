//! Project handlers: scaffold, update, delete

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use crate::error::{Error, Result};
use crate::handler::{cmd, ensure_tool, run_tool, ActionHandler};
use crate::request::{ActionPlan, ActionRequest, HandlerOutcome};

use super::validate_name;

/// Scaffold a new project directory and initialize a git repository
pub struct CreateProject {
    root: PathBuf,
}

impl CreateProject {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn project_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

#[async_trait]
impl ActionHandler for CreateProject {
    fn name(&self) -> &'static str {
        "create-project"
    }

    fn validate(&self, request: &ActionRequest) -> Result<()> {
        let name = request
            .slots
            .get_str("name")
            .ok_or_else(|| Error::validation("name", "a project name is required"))?;
        validate_name(name)
    }

    fn plan(&self, request: &ActionRequest) -> ActionPlan {
        let name = request.slots.get_str("name").unwrap_or("<name>");
        let dir = self.project_dir(name).display().to_string();
        ActionPlan::new(
            format!("Scaffold project '{name}' and initialize a git repository"),
            vec![cmd(&["mkdir", "-p", &dir]), cmd(&["git", "-C", &dir, "init"])],
        )
    }

    async fn execute(&self, request: &ActionRequest) -> Result<HandlerOutcome> {
        ensure_tool("git")?;
        let name = request.require_name()?;
        let dir = self.project_dir(name);

        std::fs::create_dir_all(&dir)?;
        run_tool(
            "git",
            &["-C".into(), dir.display().to_string(), "init".into()],
        )
        .await?;

        info!(project = name, path = %dir.display(), "project scaffolded");
        Ok(HandlerOutcome::message(format!(
            "Project '{name}' scaffolded at {}",
            dir.display()
        )))
    }
}

/// Pull the latest changes into an existing project checkout
pub struct UpdateProject {
    root: PathBuf,
}

impl UpdateProject {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[async_trait]
impl ActionHandler for UpdateProject {
    fn name(&self) -> &'static str {
        "update-project"
    }

    fn validate(&self, request: &ActionRequest) -> Result<()> {
        validate_name(request.require_name()?)
    }

    fn plan(&self, request: &ActionRequest) -> ActionPlan {
        let name = request.target_name().unwrap_or("<name>");
        let dir = self.root.join(name).display().to_string();
        ActionPlan::new(
            format!("Update project '{name}' from its remote"),
            vec![cmd(&["git", "-C", &dir, "pull", "--ff-only"])],
        )
    }

    async fn execute(&self, request: &ActionRequest) -> Result<HandlerOutcome> {
        ensure_tool("git")?;
        let name = request.require_name()?;
        let dir = self.root.join(name);

        run_tool(
            "git",
            &[
                "-C".into(),
                dir.display().to_string(),
                "pull".into(),
                "--ff-only".into(),
            ],
        )
        .await?;

        Ok(HandlerOutcome::message(format!("Project '{name}' updated")))
    }
}

/// Remove a project's external resources and its directory
pub struct DeleteProject {
    root: PathBuf,
}

impl DeleteProject {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Cleanup command lines derived from the recorded handles
    fn cleanup_commands(&self, request: &ActionRequest) -> Vec<Vec<String>> {
        let handles = request
            .target
            .as_ref()
            .map(|t| t.handles.clone())
            .unwrap_or_default();
        let mut commands = Vec::new();

        for container in &handles.containers {
            commands.push(cmd(&["docker", "rm", "-f", container]));
        }
        for deployment in &handles.deployments {
            commands.push(cmd(&["kubectl", "delete", "deployment", deployment]));
        }
        for image in &handles.images {
            commands.push(cmd(&["docker", "rmi", image]));
        }
        if let Some(name) = request.target_name() {
            commands.push(cmd(&["rm", "-rf", &self.root.join(name).display().to_string()]));
        }

        commands
    }
}

#[async_trait]
impl ActionHandler for DeleteProject {
    fn name(&self) -> &'static str {
        "delete-project"
    }

    fn validate(&self, request: &ActionRequest) -> Result<()> {
        validate_name(request.require_name()?)
    }

    fn plan(&self, request: &ActionRequest) -> ActionPlan {
        let name = request.target_name().unwrap_or("<name>");
        ActionPlan::new(
            format!("Delete project '{name}' and every resource recorded for it"),
            self.cleanup_commands(request),
        )
    }

    async fn execute(&self, request: &ActionRequest) -> Result<HandlerOutcome> {
        let name = request.require_name()?.to_string();
        let handles = request
            .target
            .as_ref()
            .map(|t| t.handles.clone())
            .unwrap_or_default();

        if !handles.containers.is_empty() {
            ensure_tool("docker")?;
            for container in &handles.containers {
                run_tool("docker", &["rm".into(), "-f".into(), container.clone()]).await?;
            }
        }

        if !handles.deployments.is_empty() {
            ensure_tool("kubectl")?;
            for deployment in &handles.deployments {
                run_tool(
                    "kubectl",
                    &["delete".into(), "deployment".into(), deployment.clone()],
                )
                .await?;
            }
        }

        if !handles.images.is_empty() {
            ensure_tool("docker")?;
            for image in &handles.images {
                run_tool("docker", &["rmi".into(), image.clone()]).await?;
            }
        }

        let dir = self.root.join(&name);
        if dir.exists() {
            std::fs::remove_dir_all(&dir)?;
        }

        info!(project = %name, "project deleted");
        Ok(HandlerOutcome::message(format!("Project '{name}' deleted")))
    }
}
