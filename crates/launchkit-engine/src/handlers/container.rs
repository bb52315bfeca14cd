//! Container handlers backed by the docker CLI

use async_trait::async_trait;
use launchkit_registry::ResourceHandles;

use crate::error::{Error, Result};
use crate::handler::{cmd, ensure_tool, run_tool, ActionHandler};
use crate::request::{ActionPlan, ActionRequest, HandlerOutcome};

use super::validate_name;

/// Container name derived from the project name
fn container_name(project: &str) -> String {
    format!("{project}-app")
}

/// Image tag the container runs, matching what `build image` produces
fn image_tag(project: &str) -> String {
    format!("{project}:latest")
}

/// Create a container for a project from its built image
pub struct CreateContainer;

#[async_trait]
impl ActionHandler for CreateContainer {
    fn name(&self) -> &'static str {
        "create-container"
    }

    fn validate(&self, request: &ActionRequest) -> Result<()> {
        validate_name(request.require_name()?)
    }

    fn plan(&self, request: &ActionRequest) -> ActionPlan {
        let name = request.target_name().unwrap_or("<name>");
        ActionPlan::new(
            format!("Create container '{}' for project '{name}'", container_name(name)),
            vec![cmd(&[
                "docker",
                "container",
                "create",
                "--name",
                &container_name(name),
                &image_tag(name),
            ])],
        )
    }

    async fn execute(&self, request: &ActionRequest) -> Result<HandlerOutcome> {
        ensure_tool("docker")?;
        let name = request.require_name()?;
        let container = container_name(name);

        run_tool(
            "docker",
            &[
                "container".into(),
                "create".into(),
                "--name".into(),
                container.clone(),
                image_tag(name),
            ],
        )
        .await?;

        Ok(
            HandlerOutcome::message(format!("Container '{container}' created")).with_handles(
                ResourceHandles {
                    containers: vec![container],
                    ..Default::default()
                },
            ),
        )
    }
}

/// Remove every container recorded for a project
pub struct DeleteContainer;

impl DeleteContainer {
    fn containers(request: &ActionRequest) -> Vec<String> {
        request
            .target
            .as_ref()
            .map(|t| t.handles.containers.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ActionHandler for DeleteContainer {
    fn name(&self) -> &'static str {
        "delete-container"
    }

    fn validate(&self, request: &ActionRequest) -> Result<()> {
        validate_name(request.require_name()?)
    }

    fn plan(&self, request: &ActionRequest) -> ActionPlan {
        let name = request.target_name().unwrap_or("<name>");
        let commands = Self::containers(request)
            .iter()
            .map(|c| cmd(&["docker", "rm", "-f", c]))
            .collect();
        ActionPlan::new(
            format!("Remove the containers recorded for project '{name}'"),
            commands,
        )
    }

    async fn execute(&self, request: &ActionRequest) -> Result<HandlerOutcome> {
        let name = request.require_name()?;
        let containers = Self::containers(request);
        if containers.is_empty() {
            return Err(Error::handler_failure(format!(
                "no containers recorded for project '{name}'"
            )));
        }

        ensure_tool("docker")?;
        for container in &containers {
            run_tool("docker", &["rm".into(), "-f".into(), container.clone()]).await?;
        }

        Ok(HandlerOutcome::message(format!(
            "Removed {} container(s) for project '{name}'",
            containers.len()
        )))
    }
}
