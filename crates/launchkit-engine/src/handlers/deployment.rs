//! Deployment handlers backed by the kubectl CLI

use std::path::PathBuf;

use async_trait::async_trait;
use launchkit_registry::ResourceHandles;

use crate::error::{Error, Result};
use crate::handler::{cmd, ensure_tool, run_tool, ActionHandler};
use crate::request::{ActionPlan, ActionRequest, HandlerOutcome};

use super::validate_name;

/// Image tag deployments run, matching what `build image` produces
fn image_tag(project: &str) -> String {
    format!("{project}:latest")
}

/// The deployment a request operates on: the first recorded handle, or
/// the project name for a project that has not deployed yet
fn deployment_name(request: &ActionRequest) -> String {
    request
        .target
        .as_ref()
        .and_then(|t| t.handles.deployments.first().cloned())
        .unwrap_or_else(|| request.target_name().unwrap_or_default().to_string())
}

/// Create a deployment for a project
pub struct CreateDeployment;

#[async_trait]
impl ActionHandler for CreateDeployment {
    fn name(&self) -> &'static str {
        "create-deployment"
    }

    fn validate(&self, request: &ActionRequest) -> Result<()> {
        validate_name(request.require_name()?)
    }

    fn plan(&self, request: &ActionRequest) -> ActionPlan {
        let name = request.target_name().unwrap_or("<name>");
        ActionPlan::new(
            format!("Create deployment '{name}'"),
            vec![cmd(&[
                "kubectl",
                "create",
                "deployment",
                name,
                &format!("--image={}", image_tag(name)),
            ])],
        )
    }

    async fn execute(&self, request: &ActionRequest) -> Result<HandlerOutcome> {
        ensure_tool("kubectl")?;
        let name = request.require_name()?;

        run_tool(
            "kubectl",
            &[
                "create".into(),
                "deployment".into(),
                name.into(),
                format!("--image={}", image_tag(name)),
            ],
        )
        .await?;

        Ok(
            HandlerOutcome::message(format!("Deployment '{name}' created")).with_handles(
                ResourceHandles {
                    deployments: vec![name.to_string()],
                    replicas: Some(1),
                    ..Default::default()
                },
            ),
        )
    }
}

/// Apply a project's deployment manifest
pub struct DeployProject {
    root: PathBuf,
}

impl DeployProject {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn manifest(&self, name: &str) -> String {
        self.root.join(name).join("deploy.yaml").display().to_string()
    }
}

#[async_trait]
impl ActionHandler for DeployProject {
    fn name(&self) -> &'static str {
        "deploy-project"
    }

    fn validate(&self, request: &ActionRequest) -> Result<()> {
        validate_name(request.require_name()?)
    }

    fn plan(&self, request: &ActionRequest) -> ActionPlan {
        let name = request.target_name().unwrap_or("<name>");
        ActionPlan::new(
            format!("Deploy project '{name}' from its manifest"),
            vec![cmd(&["kubectl", "apply", "-f", &self.manifest(name)])],
        )
    }

    async fn execute(&self, request: &ActionRequest) -> Result<HandlerOutcome> {
        ensure_tool("kubectl")?;
        let name = request.require_name()?;

        run_tool(
            "kubectl",
            &["apply".into(), "-f".into(), self.manifest(name)],
        )
        .await?;

        Ok(
            HandlerOutcome::message(format!("Project '{name}' deployed")).with_handles(
                ResourceHandles {
                    deployments: vec![name.to_string()],
                    ..Default::default()
                },
            ),
        )
    }
}

/// Change a deployment's replica count
pub struct ScaleDeployment;

#[async_trait]
impl ActionHandler for ScaleDeployment {
    fn name(&self) -> &'static str {
        "scale-deployment"
    }

    fn validate(&self, request: &ActionRequest) -> Result<()> {
        validate_name(request.require_name()?)?;

        let replicas = request
            .slots
            .get_int("replicas")
            .ok_or_else(|| Error::validation("replicas", "a replica count is required"))?;
        if replicas < 0 {
            return Err(Error::validation(
                "replicas",
                format!("replica count must be non-negative, got {replicas}"),
            ));
        }
        Ok(())
    }

    fn plan(&self, request: &ActionRequest) -> ActionPlan {
        let deployment = deployment_name(request);
        let replicas = request.slots.get_int("replicas").unwrap_or_default();
        ActionPlan::new(
            format!("Scale deployment '{deployment}' to {replicas} replica(s)"),
            vec![cmd(&[
                "kubectl",
                "scale",
                "deployment",
                &deployment,
                &format!("--replicas={replicas}"),
            ])],
        )
    }

    async fn execute(&self, request: &ActionRequest) -> Result<HandlerOutcome> {
        ensure_tool("kubectl")?;
        let deployment = deployment_name(request);
        let replicas = request
            .slots
            .get_int("replicas")
            .ok_or_else(|| Error::validation("replicas", "a replica count is required"))?;

        run_tool(
            "kubectl",
            &[
                "scale".into(),
                "deployment".into(),
                deployment.clone(),
                format!("--replicas={replicas}"),
            ],
        )
        .await?;

        Ok(HandlerOutcome::message(format!(
            "Deployment '{deployment}' scaled to {replicas} replica(s)"
        ))
        .with_handles(ResourceHandles {
            replicas: Some(replicas),
            ..Default::default()
        }))
    }
}

/// Remove every deployment recorded for a project
pub struct DeleteDeployment;

impl DeleteDeployment {
    fn deployments(request: &ActionRequest) -> Vec<String> {
        request
            .target
            .as_ref()
            .map(|t| t.handles.deployments.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ActionHandler for DeleteDeployment {
    fn name(&self) -> &'static str {
        "delete-deployment"
    }

    fn validate(&self, request: &ActionRequest) -> Result<()> {
        validate_name(request.require_name()?)
    }

    fn plan(&self, request: &ActionRequest) -> ActionPlan {
        let name = request.target_name().unwrap_or("<name>");
        let commands = Self::deployments(request)
            .iter()
            .map(|d| cmd(&["kubectl", "delete", "deployment", d]))
            .collect();
        ActionPlan::new(
            format!("Remove the deployments recorded for project '{name}'"),
            commands,
        )
    }

    async fn execute(&self, request: &ActionRequest) -> Result<HandlerOutcome> {
        let name = request.require_name()?;
        let deployments = Self::deployments(request);
        if deployments.is_empty() {
            return Err(Error::handler_failure(format!(
                "no deployments recorded for project '{name}'"
            )));
        }

        ensure_tool("kubectl")?;
        for deployment in &deployments {
            run_tool(
                "kubectl",
                &["delete".into(), "deployment".into(), deployment.clone()],
            )
            .await?;
        }

        Ok(HandlerOutcome::message(format!(
            "Removed {} deployment(s) for project '{name}'",
            deployments.len()
        )))
    }
}
