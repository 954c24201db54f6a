pub mod config;
pub mod domain;
pub mod errors;
pub mod lookup;
pub mod render;

pub use config::{AppConfig, ConfigError, LoadOptions, LogFormat, OctopusConfig};
pub use domain::dashboard::{
    ChannelId, DashboardSnapshot, Deployment, Environment, EnvironmentId, Project, ProjectGroup,
    ProjectId, ReleaseProgression, RunbookRun, RunbookRunsByEnvironment, Tenant, TenantId,
};
pub use domain::github::Enrichment;
pub use domain::state::{CiConclusion, CiStatus, ExecutionState};
pub use domain::{ProjectRef, RunbookRef};
pub use errors::{ApplicationError, InterfaceError, RenderError};
pub use lookup::{ChannelLookup, LookupError, NameDirectory, TenantLookup};
pub use render::{
    project_names_reply, render_project_dashboard, render_project_tenant_progression,
    render_runbook_dashboard, render_space_dashboard, RenderContext,
};
