use chrono::{DateTime, Utc};

use crate::domain::dashboard::{DeploymentId, ProjectId};
use crate::domain::github::{
    GithubActionStatus, GithubRepoRef, IssueSummary, PullRequestSummary, WorkflowRun,
};
use crate::render::icons::ci_icon;
use crate::render::time::time_since;
use crate::render::RenderContext;

pub fn deployment_url(
    ctx: &RenderContext,
    project_id: &ProjectId,
    release_version: &str,
    deployment_id: &DeploymentId,
) -> String {
    format!(
        "{}/app#/{}/projects/{}/deployments/releases/{}/deployments/{}",
        ctx.base_url.trim_end_matches('/'),
        ctx.space_id,
        project_id,
        release_version,
        deployment_id
    )
}

pub fn repo_link(repo: Option<&GithubRepoRef>) -> Option<String> {
    repo.map(|repo| format!("🗎 [GitHub Repo]({})", repo.url()))
}

pub fn pull_request_link(
    summary: Option<&PullRequestSummary>,
    repo: Option<&GithubRepoRef>,
) -> Option<String> {
    let (summary, repo) = summary.zip(repo)?;
    Some(format!("🔁 [{}]({}/pulls)", counted(summary.count, "PR"), repo.url()))
}

pub fn issue_link(summary: Option<&IssueSummary>, repo: Option<&GithubRepoRef>) -> Option<String> {
    let (summary, repo) = summary.zip(repo)?;
    Some(format!("🐛 [{}]({}/issues)", counted(summary.count, "issue"), repo.url()))
}

/// `icon [name sha](url)` for the run that built a release.
pub fn workflow_run_link(run: &WorkflowRun) -> String {
    format!(
        "{} [{} {}]({})",
        ci_icon(run.status.as_ref(), run.conclusion.as_ref()),
        run.name,
        run.short_sha.as_deref().unwrap_or_default(),
        run.url.as_deref().unwrap_or_default()
    )
}

/// Latest workflow status of a project's repository, plus its age when known.
pub fn workflow_status_lines(
    status: Option<&GithubActionStatus>,
    now: DateTime<Utc>,
) -> Vec<String> {
    let Some(status) = status else {
        return Vec::new();
    };

    let mut lines = vec![format!(
        "{} [{} {}]({})",
        ci_icon(status.status.as_ref(), status.conclusion.as_ref()),
        status.name,
        status.short_sha,
        status.url
    )];
    if let Some(created_at) = status.created_at {
        lines.push(format!("🕗 {} ago", time_since(now, created_at)));
    }
    lines
}

fn counted(count: u64, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
