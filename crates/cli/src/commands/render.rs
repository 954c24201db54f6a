use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use octopilot_core::config::{AppConfig, LoadOptions};
use octopilot_core::domain::github::Enrichment;
use octopilot_core::domain::{ProjectRef, RunbookRef};
use octopilot_core::errors::{ApplicationError, RenderError};
use octopilot_core::lookup::NameDirectory;
use octopilot_core::render::{
    project_names_reply, render_project_dashboard, render_project_tenant_progression,
    render_runbook_dashboard, render_space_dashboard, RenderContext,
};
use octopilot_core::DashboardSnapshot;
use serde::Deserialize;
use tracing::{info, warn};

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Report {
    Space,
    Project,
    Tenants,
    Runbook,
    Projects,
}

impl Report {
    pub fn command(self) -> &'static str {
        match self {
            Self::Space => "space",
            Self::Project => "project",
            Self::Tenants => "tenants",
            Self::Runbook => "runbook",
            Self::Projects => "projects",
        }
    }
}

/// Contents of a `--request` file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RenderRequest {
    pub dashboard: DashboardSnapshot,
    #[serde(default)]
    pub enrichment: Enrichment,
    #[serde(default)]
    pub project: Option<ProjectRef>,
    #[serde(default)]
    pub runbook: Option<RunbookRef>,
    #[serde(default)]
    pub channel_names: HashMap<String, String>,
    #[serde(default)]
    pub tenant_names: HashMap<String, String>,
}

pub fn run(
    report: Report,
    load: LoadOptions,
    request_path: &Path,
    now: Option<&str>,
) -> CommandResult {
    let command = report.command();
    let config = match AppConfig::load(load) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                command,
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };
    crate::init_logging(&config.logging);

    let result = parse_now(now).and_then(|now| render(report, &config, request_path, now));
    match result {
        Ok(markdown) => {
            info!(
                event_name = "cli.render.completed",
                command,
                request = %request_path.display(),
                bytes = markdown.len(),
                "dashboard rendered"
            );
            CommandResult::output(markdown)
        }
        Err(error) => {
            let error_class = error_class(&error);
            let detail = error.to_string();
            let interface = error.into_interface(correlation_id(command));
            warn!(
                event_name = "cli.render.failed",
                command,
                error_class,
                correlation_id = interface.correlation_id(),
                error = %detail,
                "dashboard render failed"
            );
            CommandResult::interface_failure(command, error_class, &interface, detail, 3)
        }
    }
}

/// Loads the request file and renders `report` against it.
pub fn render(
    report: Report,
    config: &AppConfig,
    request_path: &Path,
    now: DateTime<Utc>,
) -> Result<String, ApplicationError> {
    let request = load_request(request_path)
        .map_err(|error| ApplicationError::Input(format!("{error:#}")))?;

    let ctx = RenderContext::from_config(&config.octopus, now);
    let space_name = config.octopus.space_name.as_str();
    let names = NameDirectory::new(request.channel_names, request.tenant_names);

    let markdown = match report {
        Report::Space => {
            render_space_dashboard(&ctx, space_name, &request.dashboard, &request.enrichment)?
        }
        Report::Project => render_project_dashboard(
            &ctx,
            space_name,
            required(request.project.as_ref(), "Project")?,
            &request.dashboard,
            &request.enrichment,
        )?,
        Report::Tenants => render_project_tenant_progression(
            &ctx,
            space_name,
            required(request.project.as_ref(), "Project")?,
            &request.dashboard,
            &request.enrichment,
            &names,
        )?,
        Report::Runbook => render_runbook_dashboard(
            &ctx,
            required(request.project.as_ref(), "Project")?,
            required(request.runbook.as_ref(), "Runbook")?,
            &request.dashboard,
            &names,
        )?,
        Report::Projects => {
            let projects = request.dashboard.projects()?;
            let project_names: Vec<&str> =
                projects.iter().map(|project| project.name.as_str()).collect();
            project_names_reply(Some(space_name), &project_names)
        }
    };

    Ok(markdown)
}

fn load_request(path: &Path) -> anyhow::Result<RenderRequest> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read request file `{}`", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("could not parse request file `{}`", path.display()))
}

fn parse_now(raw: Option<&str>) -> Result<DateTime<Utc>, ApplicationError> {
    let Some(raw) = raw else {
        return Ok(Utc::now());
    };

    DateTime::parse_from_rfc3339(raw.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|error| ApplicationError::Input(format!("invalid --now `{raw}`: {error}")))
}

fn correlation_id(command: &str) -> String {
    format!("{command}-{}", Utc::now().timestamp_millis())
}

fn required<'a, T>(value: Option<&'a T>, key: &str) -> Result<&'a T, ApplicationError> {
    value.ok_or_else(|| ApplicationError::Input(format!("request is missing `{key}`")))
}

fn error_class(error: &ApplicationError) -> &'static str {
    match error {
        ApplicationError::Input(_) => "invalid_input",
        ApplicationError::Render(RenderError::MissingCollection { .. }) => "snapshot_contract",
        ApplicationError::Render(RenderError::Lookup(_)) => "name_lookup",
        ApplicationError::Configuration(_) => "config_validation",
    }
}
