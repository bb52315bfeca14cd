//! Registry inspection commands and shared rendering

use anyhow::Result;
use tabled::{settings::Style, Table, Tabled};

use launchkit_core::ResourceKind;
use launchkit_registry::ProjectRecord;

use crate::cli::{ProjectsInfoArgs, ProjectsListArgs};
use crate::context::AppContext;
use crate::output;

/// `launchkit projects list`
pub async fn list(args: ProjectsListArgs, ctx: &AppContext) -> Result<()> {
    let records = ctx.dispatcher.store().list()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    render_list(ResourceKind::Project, &records);
    Ok(())
}

/// `launchkit projects info <name>`
pub async fn info(args: ProjectsInfoArgs, ctx: &AppContext) -> Result<()> {
    let record = ctx
        .dispatcher
        .store()
        .get(&args.name)?
        .ok_or_else(|| launchkit_engine::Error::no_such_target(&args.name))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    render_details(&record);
    Ok(())
}

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "STACK")]
    stack: String,
    #[tabled(rename = "STATE")]
    state: String,
    #[tabled(rename = "CONTAINERS")]
    containers: usize,
    #[tabled(rename = "DEPLOYMENTS")]
    deployments: usize,
    #[tabled(rename = "IMAGES")]
    images: usize,
    #[tabled(rename = "CREATED")]
    created: String,
}

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "PROJECT")]
    project: String,
}

/// Render a registry listing for the requested resource kind
pub(crate) fn render_list(kind: ResourceKind, records: &[ProjectRecord]) {
    if records.is_empty() {
        output::info("No projects registered yet");
        return;
    }

    match kind {
        ResourceKind::Project => {
            let rows: Vec<ProjectRow> = records
                .iter()
                .map(|r| ProjectRow {
                    name: r.name.clone(),
                    stack: r.stack.clone(),
                    state: r.state.to_string(),
                    containers: r.handles.containers.len(),
                    deployments: r.handles.deployments.len(),
                    images: r.handles.images.len(),
                    created: r.created_at.format("%Y-%m-%d").to_string(),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::sharp()));
        }
        _ => {
            let rows: Vec<ResourceRow> = records
                .iter()
                .flat_map(|r| {
                    let handles = match kind {
                        ResourceKind::Container => &r.handles.containers,
                        ResourceKind::Deployment => &r.handles.deployments,
                        ResourceKind::Image => &r.handles.images,
                        ResourceKind::Project => unreachable!("handled above"),
                    };
                    handles.iter().map(|h| ResourceRow {
                        name: h.clone(),
                        project: r.name.clone(),
                    })
                })
                .collect();

            if rows.is_empty() {
                output::info(&format!("No {kind}s recorded"));
            } else {
                println!("{}", Table::new(rows).with(Style::sharp()));
            }
        }
    }
}

/// Render the detail view for one record
pub(crate) fn render_details(record: &ProjectRecord) {
    output::header(&format!("Project: {}", record.name));
    output::kv("stack", &record.stack);
    output::kv("state", &record.state.to_string());
    output::kv("created", &record.created_at.format("%Y-%m-%d %H:%M UTC").to_string());
    output::kv("updated", &record.updated_at.format("%Y-%m-%d %H:%M UTC").to_string());

    if let Some(replicas) = record.handles.replicas {
        output::kv("replicas", &replicas.to_string());
    }
    if let Some(repository) = &record.handles.repository {
        output::kv("repository", repository);
    }
    if !record.handles.containers.is_empty() {
        output::kv("containers", &record.handles.containers.join(", "));
    }
    if !record.handles.deployments.is_empty() {
        output::kv("deployments", &record.handles.deployments.join(", "));
    }
    if !record.handles.images.is_empty() {
        output::kv("images", &record.handles.images.join(", "));
    }

    if let Some(failure) = &record.last_failure {
        output::warning(&format!(
            "last failure ({}): {}",
            failure.at.format("%Y-%m-%d %H:%M UTC"),
            failure.message
        ));
    }
    if record.was_interrupted() {
        output::warning("a previous action was interrupted mid-transition; retry or delete");
    }
}
