//! Owner-scoped project and file routes.

use super::error::ApiError;
use super::{authorize, AppState};
use crate::models::{BlobRef, NodeId, PathSegment, Project, ProjectId, WorkspaceNode};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct ListProjectsQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct NameBody {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChildrenQuery {
    pub parent: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileBody {
    #[serde(default)]
    pub parent_id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub content: String,
    /// Creates a binary file referencing an uploaded blob instead of text.
    #[serde(default)]
    pub storage_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderBody {
    #[serde(default)]
    pub parent_id: Option<u64>,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ContentBody {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: NodeId,
}

#[derive(Debug, Serialize)]
pub struct Removed {
    pub removed: usize,
}

pub async fn list_projects(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListProjectsQuery>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let owner = authorize(&state, &headers)?;
    let projects = match query.limit {
        Some(limit) => state.store.list_projects_partial(&owner, limit),
        None => state.store.list_projects(&owner),
    };
    Ok(Json(projects))
}

pub async fn create_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<NameBody>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let owner = authorize(&state, &headers)?;
    let project = state.store.create_project(&owner, &body.name);
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<Project>, ApiError> {
    let owner = authorize(&state, &headers)?;
    Ok(Json(state.store.get_project(&owner, ProjectId::from_token(id))?))
}

pub async fn rename_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<NameBody>,
) -> Result<Json<Project>, ApiError> {
    let owner = authorize(&state, &headers)?;
    let project = state
        .store
        .rename_project(&owner, ProjectId::from_token(id), &body.name)?;
    Ok(Json(project))
}

pub async fn list_files(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<Vec<WorkspaceNode>>, ApiError> {
    let owner = authorize(&state, &headers)?;
    Ok(Json(
        state.store.list_by_project(&owner, ProjectId::from_token(id))?,
    ))
}

pub async fn list_children(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Query(query): Query<ChildrenQuery>,
) -> Result<Json<Vec<WorkspaceNode>>, ApiError> {
    let owner = authorize(&state, &headers)?;
    let children = state.store.list_children(
        &owner,
        ProjectId::from_token(id),
        query.parent.map(NodeId::from_token),
    )?;
    Ok(Json(children))
}

pub async fn create_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<CreateFileBody>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    let owner = authorize(&state, &headers)?;
    let project = ProjectId::from_token(id);
    let parent = body.parent_id.map(NodeId::from_token);
    let id = match body.storage_id {
        Some(blob) => {
            state
                .store
                .create_binary_file(&owner, project, parent, &body.name, BlobRef::new(blob))?
        }
        None => state
            .store
            .create_file(&owner, project, parent, &body.name, &body.content)?,
    };
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn create_folder(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<CreateFolderBody>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    let owner = authorize(&state, &headers)?;
    let id = state.store.create_folder(
        &owner,
        ProjectId::from_token(id),
        body.parent_id.map(NodeId::from_token),
        &body.name,
    )?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn sweep_orphans(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<Removed>, ApiError> {
    let owner = authorize(&state, &headers)?;
    let removed = state
        .store
        .sweep_orphans(&owner, ProjectId::from_token(id))?;
    Ok(Json(Removed { removed }))
}

pub async fn get_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<WorkspaceNode>, ApiError> {
    let owner = authorize(&state, &headers)?;
    Ok(Json(state.store.get_file(&owner, NodeId::from_token(id))?))
}

pub async fn rename_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<NameBody>,
) -> Result<StatusCode, ApiError> {
    let owner = authorize(&state, &headers)?;
    state
        .store
        .rename(&owner, NodeId::from_token(id), &body.name)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<Removed>, ApiError> {
    let owner = authorize(&state, &headers)?;
    let removed = state.store.delete_node(&owner, NodeId::from_token(id))?;
    Ok(Json(Removed { removed }))
}

pub async fn file_path(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<Vec<PathSegment>>, ApiError> {
    let owner = authorize(&state, &headers)?;
    Ok(Json(state.store.resolve_path(&owner, NodeId::from_token(id))?))
}

pub async fn update_content(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<ContentBody>,
) -> Result<StatusCode, ApiError> {
    let owner = authorize(&state, &headers)?;
    state
        .store
        .update_content(&owner, NodeId::from_token(id), &body.content)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "../../tests/unit/server/workspace.rs"]
mod tests;
