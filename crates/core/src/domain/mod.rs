pub mod dashboard;
pub mod github;
pub mod state;

use serde::{Deserialize, Serialize};

use crate::domain::dashboard::{ProjectId, RunbookId};

/// Project named in a report header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProjectRef {
    pub id: ProjectId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RunbookRef {
    pub id: RunbookId,
    pub name: String,
}
