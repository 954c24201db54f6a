use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::state::ExecutionState;
use crate::errors::RenderError;

macro_rules! entity_id {
    ($($name:ident),+ $(,)?) => {
        $(
            #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
            pub struct $name(pub String);

            impl $name {
                pub fn new(value: impl Into<String>) -> Self {
                    Self(value.into())
                }

                pub fn as_str(&self) -> &str {
                    &self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }
        )+
    };
}

entity_id!(
    EnvironmentId,
    ProjectGroupId,
    ProjectId,
    TenantId,
    ReleaseId,
    DeploymentId,
    ChannelId,
    RunbookId,
);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Environment {
    pub id: EnvironmentId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProjectGroup {
    pub id: ProjectGroupId,
    pub name: String,
    /// Column order for every project in the group.
    #[serde(default)]
    pub environment_ids: Vec<EnvironmentId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub project_group_id: ProjectGroupId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tenant {
    /// `None` is the synthetic "untenanted" row, not a missing value.
    #[serde(default)]
    pub id: Option<TenantId>,
    pub name: String,
    #[serde(default)]
    pub project_environments: HashMap<ProjectId, Vec<EnvironmentId>>,
}

impl Tenant {
    /// Whether this row stands for untenanted deployments when choosing its
    /// environments. A blank id counts as untenanted here; deployment matching
    /// still compares `id` exactly.
    pub fn is_untenanted(&self) -> bool {
        self.id.as_ref().map_or(true, |id| id.as_str().is_empty())
    }

    /// Environments the tenant is connected to for `project_id`; empty when the
    /// tenant is not connected to the project at all.
    pub fn allowed_environments(&self, project_id: &ProjectId) -> &[EnvironmentId] {
        self.project_environments.get(project_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Deployment {
    pub project_id: ProjectId,
    pub environment_id: EnvironmentId,
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
    #[serde(default)]
    pub release_id: Option<ReleaseId>,
    pub release_version: String,
    pub deployment_id: DeploymentId,
    pub created: DateTime<Utc>,
    pub state: ExecutionState,
    #[serde(default)]
    pub has_warnings_or_errors: bool,
    #[serde(default)]
    pub channel_id: Option<ChannelId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReleaseSummary {
    pub id: ReleaseId,
    pub version: String,
}

/// One row of a project progression: a release and where it has been deployed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReleaseProgression {
    pub release: ReleaseSummary,
    #[serde(default)]
    pub deployments: HashMap<EnvironmentId, Vec<Deployment>>,
}

impl ReleaseProgression {
    pub fn deployments_to(&self, environment_id: &EnvironmentId) -> Option<&[Deployment]> {
        self.deployments.get(environment_id).map(Vec::as_slice)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RunbookRun {
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
    pub created: DateTime<Utc>,
    pub state: ExecutionState,
    #[serde(default)]
    pub has_warnings_or_errors: bool,
}

impl RunbookRun {
    /// Tenant the run belongs to; blank ids are treated the same as no tenant.
    pub fn tenant(&self) -> Option<&TenantId> {
        self.tenant_id.as_ref().filter(|id| !id.as_str().is_empty())
    }
}

/// Runbook runs grouped by environment id, in the order the platform listed
/// the environments. A plain map would lose that order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunbookRunsByEnvironment(Vec<(EnvironmentId, Vec<RunbookRun>)>);

impl RunbookRunsByEnvironment {
    pub fn environment_ids(&self) -> impl Iterator<Item = &EnvironmentId> {
        self.0.iter().map(|(environment_id, _)| environment_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EnvironmentId, &[RunbookRun])> {
        self.0.iter().map(|(environment_id, runs)| (environment_id, runs.as_slice()))
    }
}

impl Serialize for RunbookRunsByEnvironment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (environment_id, runs) in &self.0 {
            map.serialize_entry(environment_id, runs)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RunbookRunsByEnvironment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedRunsVisitor;

        impl<'de> Visitor<'de> for OrderedRunsVisitor {
            type Value = RunbookRunsByEnvironment;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of environment id to runbook runs")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((environment_id, runs)) =
                    access.next_entry::<EnvironmentId, Vec<RunbookRun>>()?
                {
                    if entries.iter().any(|(seen, _)| seen == &environment_id) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate environment `{environment_id}` in runbook runs"
                        )));
                    }
                    entries.push((environment_id, runs));
                }
                Ok(RunbookRunsByEnvironment(entries))
            }
        }

        deserializer.deserialize_map(OrderedRunsVisitor)
    }
}

/// Raw dashboard payload as assembled by the fetching layer.
///
/// Every collection is optional on the wire because each report reads a
/// different subset. Renderers call the accessors below, which turn an absent
/// collection into [`RenderError::MissingCollection`] instead of rendering a
/// silently empty report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DashboardSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environments: Option<Vec<Environment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_groups: Option<Vec<ProjectGroup>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Project>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Deployment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub releases: Option<Vec<ReleaseProgression>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenants: Option<Vec<Tenant>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runbook_runs: Option<RunbookRunsByEnvironment>,
}

impl DashboardSnapshot {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn environments(&self) -> Result<&[Environment], RenderError> {
        require(self.environments.as_deref(), "Environments")
    }

    pub fn project_groups(&self) -> Result<&[ProjectGroup], RenderError> {
        require(self.project_groups.as_deref(), "ProjectGroups")
    }

    pub fn projects(&self) -> Result<&[Project], RenderError> {
        require(self.projects.as_deref(), "Projects")
    }

    pub fn items(&self) -> Result<&[Deployment], RenderError> {
        require(self.items.as_deref(), "Items")
    }

    pub fn releases(&self) -> Result<&[ReleaseProgression], RenderError> {
        require(self.releases.as_deref(), "Releases")
    }

    pub fn tenants(&self) -> Result<&[Tenant], RenderError> {
        require(self.tenants.as_deref(), "Tenants")
    }

    pub fn runbook_runs(&self) -> Result<&RunbookRunsByEnvironment, RenderError> {
        require(self.runbook_runs.as_ref(), "RunbookRuns")
    }

    /// Name of `environment_id`, if the snapshot carries a record for it.
    pub fn environment_name(&self, environment_id: &EnvironmentId) -> Option<&str> {
        self.environments
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|environment| &environment.id == environment_id)
            .map(|environment| environment.name.as_str())
    }
}

fn require<'a, T: ?Sized>(value: Option<&'a T>, key: &'static str) -> Result<&'a T, RenderError> {
    value.ok_or(RenderError::MissingCollection { key })
}
