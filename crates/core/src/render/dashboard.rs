use tracing::{debug, warn};

use crate::domain::dashboard::{
    DashboardSnapshot, Deployment, Environment, EnvironmentId, ProjectId, ReleaseId,
    RunbookRunsByEnvironment, Tenant, TenantId,
};
use crate::domain::github::Enrichment;
use crate::domain::{ProjectRef, RunbookRef};
use crate::errors::RenderError;
use crate::lookup::{ChannelLookup, TenantLookup};
use crate::render::icons::state_icon;
use crate::render::links::{
    deployment_url, issue_link, pull_request_link, repo_link, workflow_run_link,
    workflow_status_lines,
};
use crate::render::table::{self, LINE_BREAK, PLACEHOLDER};
use crate::render::time::time_since;
use crate::render::RenderContext;

pub const GITHUB_COLUMN: &str = "GitHub";
pub const UNTENANTED: &str = "Untenanted";
pub const NO_DEPLOYMENTS: &str = "No deployments";

/// Every project group of a space as its own table: one row per project, one
/// column per environment of the group.
pub fn render_space_dashboard(
    ctx: &RenderContext,
    space_name: &str,
    dashboard: &DashboardSnapshot,
    enrichment: &Enrichment,
) -> Result<String, RenderError> {
    const REPORT: &str = "space_dashboard";
    let project_groups = checked(REPORT, dashboard.project_groups())?;
    let projects = checked(REPORT, dashboard.projects())?;
    checked(REPORT, dashboard.environments())?;
    let items = checked(REPORT, dashboard.items())?;
    let with_github = enrichment.has_ci_statuses();

    let mut out = format!("# {space_name}\n\n");

    for group in project_groups {
        let mut columns = vec![group.name.clone()];
        if with_github {
            columns.push(GITHUB_COLUMN.to_string());
        }
        columns.extend(
            group
                .environment_ids
                .iter()
                .map(|environment_id| column_name(dashboard, environment_id)),
        );
        out.push_str(&table::header(&columns));

        for project in projects.iter().filter(|project| project.project_group_id == group.id) {
            out.push_str(&format!("| {} ", project.name));

            if with_github {
                push_cell(&mut out, &table::cell(&enrichment_lines(ctx, enrichment, &project.id)));
            }

            for environment_id in &group.environment_ids {
                let deployment = items.iter().find(|deployment| {
                    deployment.project_id == project.id
                        && &deployment.environment_id == environment_id
                });
                match deployment {
                    Some(deployment) => {
                        push_cell(&mut out, &deployment_lines(ctx, deployment).join(LINE_BREAK));
                    }
                    None => push_cell(&mut out, PLACEHOLDER),
                }
            }

            out.push_str("|\n");
        }

        out.push('\n');
    }

    debug!(
        event_name = "render.space_dashboard.completed",
        space_name,
        project_groups = project_groups.len(),
        github_column = with_github,
        bytes = out.len(),
        "space dashboard rendered"
    );
    Ok(out)
}

/// Release progression of one project: a row per release, a column per environment.
pub fn render_project_dashboard(
    ctx: &RenderContext,
    space_name: &str,
    project: &ProjectRef,
    dashboard: &DashboardSnapshot,
    enrichment: &Enrichment,
) -> Result<String, RenderError> {
    const REPORT: &str = "project_dashboard";
    let environments = checked(REPORT, dashboard.environments())?;
    let releases = checked(REPORT, dashboard.releases())?;

    let mut out = format!("# {space_name} / {}\n\n", project.name);
    out.push_str(&enrichment_header(ctx, enrichment, &project.id));

    let names: Vec<&str> =
        environments.iter().map(|environment| environment.name.as_str()).collect();
    out.push_str(&table::header(&names));

    for progression in releases {
        let cells: Vec<String> = environments
            .iter()
            .map(|environment| match progression.deployments_to(&environment.id) {
                Some(deployments) if !deployments.is_empty() => deployments
                    .iter()
                    .map(|deployment| {
                        let mut lines = deployment_lines(ctx, deployment);
                        lines.extend(build_lines(
                            enrichment,
                            Some(&progression.release.id),
                            deployment,
                        ));
                        lines.join(LINE_BREAK)
                    })
                    .collect::<Vec<_>>()
                    .join(LINE_BREAK),
                _ => PLACEHOLDER.to_string(),
            })
            .collect();
        out.push_str(&table::row(&cells));
    }

    debug!(
        event_name = "render.project_dashboard.completed",
        project_id = %project.id,
        environments = environments.len(),
        releases = releases.len(),
        bytes = out.len(),
        "project dashboard rendered"
    );
    Ok(out)
}

/// Latest deployment per tenant and environment, one sub-table per tenant.
pub fn render_project_tenant_progression<C>(
    ctx: &RenderContext,
    space_name: &str,
    project: &ProjectRef,
    dashboard: &DashboardSnapshot,
    enrichment: &Enrichment,
    channels: &C,
) -> Result<String, RenderError>
where
    C: ChannelLookup + ?Sized,
{
    const REPORT: &str = "project_tenant_progression";
    let environments = checked(REPORT, dashboard.environments())?;
    let tenants = checked(REPORT, dashboard.tenants())?;
    let items = checked(REPORT, dashboard.items())?;

    let mut out = format!("# {space_name} / {}\n\n", project.name);
    out.push_str(&enrichment_header(ctx, enrichment, &project.id));

    for tenant in tenants {
        out.push_str(&format!("## {}\n", tenant.name));

        let visible = tenant_environments(tenant, environments, &project.id);
        let names: Vec<&str> =
            visible.iter().map(|environment| environment.name.as_str()).collect();
        out.push_str(&table::header(&names));

        let mut columns = Vec::with_capacity(visible.len());
        for environment in &visible {
            // `None == None` is what lets the untenanted row pick up untenanted deployments.
            let deployment = items.iter().find(|deployment| {
                deployment.tenant_id == tenant.id && deployment.environment_id == environment.id
            });

            let content = match deployment {
                Some(deployment) => {
                    let mut lines = deployment_lines(ctx, deployment);
                    if let Some(channel_id) = &deployment.channel_id {
                        let channel = channels.channel_name(&ctx.space_id, channel_id)?;
                        lines.insert(1, format!("🔀 {channel}"));
                    }
                    lines.extend(build_lines(
                        enrichment,
                        deployment.release_id.as_ref(),
                        deployment,
                    ));
                    lines.join(LINE_BREAK)
                }
                None => PLACEHOLDER.to_string(),
            };
            columns.push(content);
        }

        if columns.is_empty() {
            out.push('\n');
            out.push_str(NO_DEPLOYMENTS);
        } else {
            out.push_str(&table::row(&columns));
        }
        out.push_str("\n\n");
    }

    debug!(
        event_name = "render.tenant_progression.completed",
        project_id = %project.id,
        tenants = tenants.len(),
        bytes = out.len(),
        "tenant progression rendered"
    );
    Ok(out)
}

/// Runbook run history: one row per run, grouped by tenant then environment.
///
/// Several runs for the same tenant and environment produce several rows; they
/// are not collapsed into the latest one.
pub fn render_runbook_dashboard<T>(
    ctx: &RenderContext,
    project: &ProjectRef,
    runbook: &RunbookRef,
    dashboard: &DashboardSnapshot,
    tenants: &T,
) -> Result<String, RenderError>
where
    T: TenantLookup + ?Sized,
{
    const REPORT: &str = "runbook_dashboard";
    checked(REPORT, dashboard.environments())?;
    let runs = checked(REPORT, dashboard.runbook_runs())?;

    let mut out = format!("{} / {}\n\n", project.name, runbook.name);

    let mut columns = vec![String::new()];
    columns.extend(
        runs.environment_ids().map(|environment_id| column_name(dashboard, environment_id)),
    );
    out.push_str(&table::header(&columns));

    let run_tenants = distinct_tenants(runs);
    let mut rows = 0usize;
    for tenant in &run_tenants {
        let display_name = match tenant {
            Some(tenant_id) => tenants.tenant_name(tenant_id)?,
            None => UNTENANTED.to_string(),
        };

        for (_, environment_runs) in runs.iter() {
            for run in environment_runs.iter().filter(|run| run.tenant() == *tenant) {
                let status = format!(
                    "{} {} ago",
                    state_icon(&run.state, run.has_warnings_or_errors),
                    time_since(ctx.now, run.created)
                );
                out.push_str(&table::row(&[display_name.as_str(), status.as_str()]));
                rows += 1;
            }
        }
    }

    debug!(
        event_name = "render.runbook_dashboard.completed",
        project_id = %project.id,
        runbook_id = %runbook.id,
        tenants = run_tenants.len(),
        rows,
        bytes = out.len(),
        "runbook dashboard rendered"
    );
    Ok(out)
}

fn checked<T>(report: &'static str, result: Result<T, RenderError>) -> Result<T, RenderError> {
    if let Err(error) = &result {
        warn!(
            event_name = "render.contract_violation",
            report,
            error = %error,
            "dashboard snapshot rejected"
        );
    }
    result
}

fn push_cell(out: &mut String, content: &str) {
    out.push_str("| ");
    out.push_str(content);
}

/// Environment name for a column header; ids without a record show as the raw id.
fn column_name(dashboard: &DashboardSnapshot, environment_id: &EnvironmentId) -> String {
    dashboard
        .environment_name(environment_id)
        .map(str::to_string)
        .unwrap_or_else(|| environment_id.to_string())
}

/// `icon [version](url)` and the deployment's age.
fn deployment_lines(ctx: &RenderContext, deployment: &Deployment) -> Vec<String> {
    let icon = state_icon(&deployment.state, deployment.has_warnings_or_errors);
    let url = deployment_url(
        ctx,
        &deployment.project_id,
        &deployment.release_version,
        &deployment.deployment_id,
    );

    vec![
        format!("{icon} [{}]({url})", deployment.release_version),
        format!("🕗 {} ago", time_since(ctx.now, deployment.created)),
    ]
}

/// The workflow run that built the release (first match only) and every log
/// highlight recorded for the deployment.
fn build_lines(
    enrichment: &Enrichment,
    release_id: Option<&ReleaseId>,
    deployment: &Deployment,
) -> Vec<String> {
    let mut lines: Vec<String> = release_id
        .and_then(|release_id| enrichment.workflow_run_for(release_id))
        .map(workflow_run_link)
        .into_iter()
        .collect();
    lines.extend(enrichment.highlights_for(&deployment.deployment_id).map(str::to_string));
    lines
}

/// Repo link, CI status, PR count and issue count, in that order, skipping
/// whatever the enrichment does not cover.
fn enrichment_lines(
    ctx: &RenderContext,
    enrichment: &Enrichment,
    project_id: &ProjectId,
) -> Vec<String> {
    let repo = enrichment.repo_for(project_id);

    let mut lines = Vec::new();
    lines.extend(repo_link(repo));
    lines.extend(workflow_status_lines(enrichment.ci_status_for(project_id), ctx.now));
    lines.extend(pull_request_link(enrichment.pull_requests_for(project_id), repo));
    lines.extend(issue_link(enrichment.issues_for(project_id), repo));
    lines
}

fn enrichment_header(
    ctx: &RenderContext,
    enrichment: &Enrichment,
    project_id: &ProjectId,
) -> String {
    let lines = enrichment_lines(ctx, enrichment, project_id);
    if lines.is_empty() {
        return String::new();
    }
    format!("{}\n\n", lines.join(LINE_BREAK))
}

/// Environments shown for a tenant, in project environment order. Tenanted rows
/// only keep the environments the tenant is connected to for this project.
fn tenant_environments<'a>(
    tenant: &Tenant,
    environments: &'a [Environment],
    project_id: &ProjectId,
) -> Vec<&'a Environment> {
    if tenant.is_untenanted() {
        return environments.iter().collect();
    }

    let allowed = tenant.allowed_environments(project_id);
    environments.iter().filter(|environment| allowed.contains(&environment.id)).collect()
}

/// Distinct tenants across all runs, first-seen order; `None` is untenanted.
fn distinct_tenants(runs: &RunbookRunsByEnvironment) -> Vec<Option<&TenantId>> {
    let mut seen: Vec<Option<&TenantId>> = Vec::new();
    for (_, environment_runs) in runs.iter() {
        for run in environment_runs {
            let tenant = run.tenant();
            if !seen.contains(&tenant) {
                seen.push(tenant);
            }
        }
    }
    seen
}
