//! Image handlers backed by the docker CLI

use std::path::PathBuf;

use async_trait::async_trait;
use launchkit_registry::ResourceHandles;

use crate::error::{Error, Result};
use crate::handler::{cmd, ensure_tool, run_tool, ActionHandler};
use crate::request::{ActionPlan, ActionRequest, HandlerOutcome};

use super::validate_name;

fn image_tag(project: &str) -> String {
    format!("{project}:latest")
}

/// Build a project's image from its directory
pub struct BuildImage {
    root: PathBuf,
}

impl BuildImage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[async_trait]
impl ActionHandler for BuildImage {
    fn name(&self) -> &'static str {
        "build-image"
    }

    fn validate(&self, request: &ActionRequest) -> Result<()> {
        validate_name(request.require_name()?)
    }

    fn plan(&self, request: &ActionRequest) -> ActionPlan {
        let name = request.target_name().unwrap_or("<name>");
        let dir = self.root.join(name).display().to_string();
        ActionPlan::new(
            format!("Build image '{}' for project '{name}'", image_tag(name)),
            vec![cmd(&["docker", "build", "-t", &image_tag(name), &dir])],
        )
    }

    async fn execute(&self, request: &ActionRequest) -> Result<HandlerOutcome> {
        ensure_tool("docker")?;
        let name = request.require_name()?;
        let tag = image_tag(name);

        run_tool(
            "docker",
            &[
                "build".into(),
                "-t".into(),
                tag.clone(),
                self.root.join(name).display().to_string(),
            ],
        )
        .await?;

        Ok(
            HandlerOutcome::message(format!("Image '{tag}' built")).with_handles(ResourceHandles {
                images: vec![tag],
                ..Default::default()
            }),
        )
    }
}

/// Remove every image recorded for a project
pub struct DeleteImage;

impl DeleteImage {
    fn images(request: &ActionRequest) -> Vec<String> {
        request
            .target
            .as_ref()
            .map(|t| t.handles.images.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ActionHandler for DeleteImage {
    fn name(&self) -> &'static str {
        "delete-image"
    }

    fn validate(&self, request: &ActionRequest) -> Result<()> {
        validate_name(request.require_name()?)
    }

    fn plan(&self, request: &ActionRequest) -> ActionPlan {
        let name = request.target_name().unwrap_or("<name>");
        let commands = Self::images(request)
            .iter()
            .map(|i| cmd(&["docker", "rmi", i]))
            .collect();
        ActionPlan::new(
            format!("Remove the images recorded for project '{name}'"),
            commands,
        )
    }

    async fn execute(&self, request: &ActionRequest) -> Result<HandlerOutcome> {
        let name = request.require_name()?;
        let images = Self::images(request);
        if images.is_empty() {
            return Err(Error::handler_failure(format!(
                "no images recorded for project '{name}'"
            )));
        }

        ensure_tool("docker")?;
        for image in &images {
            run_tool("docker", &["rmi".into(), image.clone()]).await?;
        }

        Ok(HandlerOutcome::message(format!(
            "Removed {} image(s) for project '{name}'",
            images.len()
        )))
    }
}
