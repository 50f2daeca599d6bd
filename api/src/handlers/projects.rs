//! Project endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{created, done, ok, ApiResponse, ApiResult};
use crate::app::{ChangeStateInput, CreateProjectInput, ProjectDetails, UpdateProjectInput};
use crate::auth::{authorize, FIELD_TEAM};
use crate::domain::entities::{
    ClientId, CurrentUser, Page, Project, ProjectFilter, ProjectId, ProjectState,
    ProjectStateChange,
};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListProjectsQuery {
    pub state: Option<ProjectState>,
    pub client_id: Option<Uuid>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> u64 {
    50
}

/// GET /api/projects
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ListProjectsQuery>,
) -> ApiResult<Vec<Project>> {
    let filter = ProjectFilter {
        state: query.state,
        client_id: query.client_id.map(ClientId),
        page: Page::new(query.limit, query.offset),
    };
    ok(state.project_service.list(&filter).await?)
}

/// GET /api/projects/:id
///
/// Project with its state history.
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ProjectDetails> {
    ok(state.project_service.show(&ProjectId(id)).await?)
}

/// POST /api/projects
///
/// Create a project from an approved quotation.
pub async fn create_project(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(input): Json<CreateProjectInput>,
) -> Result<(StatusCode, Json<ApiResponse<Project>>), AppError> {
    authorize(&current, FIELD_TEAM)?;
    let project = state.project_service.create(&current, input).await?;
    created("Project created", project)
}

/// PUT /api/projects/:id
pub async fn update_project(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateProjectInput>,
) -> ApiResult<Project> {
    authorize(&current, FIELD_TEAM)?;
    ok(state.project_service.update(&ProjectId(id), input).await?)
}

/// PATCH /api/projects/:id/state
pub async fn change_project_state(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<ChangeStateInput>,
) -> ApiResult<Project> {
    authorize(&current, FIELD_TEAM)?;
    ok(state
        .project_service
        .change_state(&current, &ProjectId(id), input)
        .await?)
}

/// GET /api/projects/:id/history
pub async fn project_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<ProjectStateChange>> {
    ok(state.project_service.history(&ProjectId(id)).await?)
}

/// DELETE /api/projects/:id
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    authorize(&current, FIELD_TEAM)?;
    state.project_service.delete(&ProjectId(id)).await?;
    done("Project deleted")
}
