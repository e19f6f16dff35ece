use super::ids::{OwnerId, ProjectId};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Importing,
    Completed,
    Failed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportStatus {
    Exporting,
    Completed,
    Failed,
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub owner: OwnerId,
    pub created_at: u64,
    /// Refreshed by every mutation to the project or any node under it.
    pub updated_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_status: Option<ImportStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_status: Option<ExportStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_repo_url: Option<String>,
}

impl Project {
    pub fn is_owned_by(&self, owner: &OwnerId) -> bool {
        &self.owner == owner
    }
}

impl super::optimistic::Keyed for Project {
    type Key = ProjectId;

    fn key(&self) -> ProjectId {
        self.id
    }
}
