//! Markdown dashboard reports.
//!
//! Every renderer is a pure function of its inputs plus the caller's `now`:
//! the same snapshot rendered twice with the same clock yields the same bytes.

pub mod dashboard;
pub mod icons;
pub mod links;
pub mod replies;
pub mod table;
pub mod time;

use chrono::{DateTime, Utc};

use crate::config::OctopusConfig;

pub use dashboard::{
    render_project_dashboard, render_project_tenant_progression, render_runbook_dashboard,
    render_space_dashboard,
};
pub use replies::project_names_reply;

/// Where deployment links point and which instant "ago" is measured from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderContext {
    pub base_url: String,
    pub space_id: String,
    pub now: DateTime<Utc>,
}

impl RenderContext {
    pub fn new(
        base_url: impl Into<String>,
        space_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self { base_url: base_url.into(), space_id: space_id.into(), now }
    }

    pub fn from_config(octopus: &OctopusConfig, now: DateTime<Utc>) -> Self {
        Self::new(octopus.url.clone(), octopus.space_id.clone(), now)
    }
}
