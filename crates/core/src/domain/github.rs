use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::dashboard::{DeploymentId, ProjectId, ReleaseId};
use crate::domain::state::{CiConclusion, CiStatus};

pub const GITHUB_BASE_URL: &str = "https://github.com";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GithubRepoRef {
    pub project_id: ProjectId,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub repo: String,
}

impl GithubRepoRef {
    /// Refs scraped from step configuration are often half filled in.
    pub fn is_complete(&self) -> bool {
        !self.owner.trim().is_empty() && !self.repo.trim().is_empty()
    }

    pub fn url(&self) -> String {
        format!("{GITHUB_BASE_URL}/{}/{}", self.owner, self.repo)
    }
}

/// Latest workflow run of the repository linked to a project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GithubActionStatus {
    pub project_id: ProjectId,
    #[serde(default)]
    pub status: Option<CiStatus>,
    #[serde(default)]
    pub conclusion: Option<CiConclusion>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub short_sha: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl GithubActionStatus {
    pub fn has_status(&self) -> bool {
        self.status.as_ref().is_some_and(CiStatus::is_present)
    }
}

/// Workflow run that built a release, matched through the release's build information.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorkflowRun {
    pub release_id: ReleaseId,
    #[serde(default)]
    pub status: Option<CiStatus>,
    #[serde(default)]
    pub conclusion: Option<CiConclusion>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub short_sha: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl WorkflowRun {
    /// A run is only linkable when both the commit and the run url are known.
    pub fn is_linkable(&self) -> bool {
        let filled = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());
        filled(&self.short_sha) && filled(&self.url)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PullRequestSummary {
    pub project_id: ProjectId,
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IssueSummary {
    pub project_id: ProjectId,
    pub count: u64,
}

/// Interesting lines pulled out of a deployment's task log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeploymentHighlight {
    pub deployment_id: DeploymentId,
    pub highlights: String,
}

/// Optional collections layered on top of a dashboard snapshot.
///
/// Each field is independent: leaving one out drops only the lines or column
/// it feeds. An empty list behaves the same as an absent one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Enrichment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_refs: Option<Vec<GithubRepoRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ci_statuses: Option<Vec<GithubActionStatus>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_requests: Option<Vec<PullRequestSummary>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<IssueSummary>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_runs: Option<Vec<WorkflowRun>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Vec<DeploymentHighlight>>,
}

impl Enrichment {
    /// Whether the space dashboard gets a `GitHub` column.
    pub fn has_ci_statuses(&self) -> bool {
        !non_empty(&self.ci_statuses).is_empty()
    }

    pub fn repo_for(&self, project_id: &ProjectId) -> Option<&GithubRepoRef> {
        non_empty(&self.repo_refs)
            .iter()
            .find(|repo| &repo.project_id == project_id && repo.is_complete())
    }

    pub fn ci_status_for(&self, project_id: &ProjectId) -> Option<&GithubActionStatus> {
        non_empty(&self.ci_statuses)
            .iter()
            .find(|status| &status.project_id == project_id && status.has_status())
    }

    pub fn pull_requests_for(&self, project_id: &ProjectId) -> Option<&PullRequestSummary> {
        non_empty(&self.pull_requests).iter().find(|summary| &summary.project_id == project_id)
    }

    pub fn issues_for(&self, project_id: &ProjectId) -> Option<&IssueSummary> {
        non_empty(&self.issues).iter().find(|summary| &summary.project_id == project_id)
    }

    /// First linkable run for the release. Later candidates are ignored, not reported.
    pub fn workflow_run_for(&self, release_id: &ReleaseId) -> Option<&WorkflowRun> {
        non_empty(&self.workflow_runs)
            .iter()
            .find(|run| &run.release_id == release_id && run.is_linkable())
    }

    pub fn highlights_for<'a>(
        &'a self,
        deployment_id: &'a DeploymentId,
    ) -> impl Iterator<Item = &'a str> + 'a {
        non_empty(&self.highlights)
            .iter()
            .filter(move |highlight| &highlight.deployment_id == deployment_id)
            .map(|highlight| highlight.highlights.as_str())
    }
}

fn non_empty<T>(collection: &Option<Vec<T>>) -> &[T] {
    collection.as_deref().unwrap_or_default()
}
