//! Project CRUD handlers. Every operation is scoped to the [`CurrentUser`].

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use snipbox_core::{ProjectDraft, ProjectId};
use tracing::info;

use crate::{auth::CurrentUser, error::ApiError, state::AppState};

/// Body of project create and update requests.
///
/// Missing fields deserialize as empty strings so that validation, not the
/// JSON extractor, reports them.
#[derive(Debug, Deserialize)]
pub struct ProjectBody {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
}

impl ProjectBody {
    fn into_draft(self) -> Result<ProjectDraft, ApiError> {
        Ok(ProjectDraft::new(&self.name, &self.code)?)
    }
}

/// An id that does not parse cannot name an existing project.
fn parse_id(raw: &str) -> Result<ProjectId, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

/// `GET /api/projects`: the caller's projects, most recently updated first.
///
/// # Errors
/// Returns [`ApiError::Internal`] on store failure.
pub async fn list_projects(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let summaries = state.projects.list(&user.user_id).await?;
    Ok(Json(summaries))
}

/// `POST /api/projects`: create a project owned by the caller.
///
/// # Errors
/// Returns [`ApiError::Validation`] for a malformed body or invalid fields.
pub async fn create_project(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Result<Json<ProjectBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let project = state.projects.create(&user.user_id, body.into_draft()?).await?;
    info!(user_id = %user.user_id, project_id = %project.id, "project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// `GET /api/projects/{id}`: one project, if the caller owns it.
///
/// # Errors
/// Returns [`ApiError::NotFound`] for an unknown, malformed or foreign id.
pub async fn get_project(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let project = state.projects.get(&user.user_id, parse_id(&id)?).await?;
    Ok(Json(project))
}

/// `PUT /api/projects/{id}`: replace name and code.
///
/// # Errors
/// Returns [`ApiError::NotFound`] for an id the caller does not own and
/// [`ApiError::Validation`] for invalid fields.
pub async fn update_project(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    body: Result<Json<ProjectBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let Json(body) = body?;
    let project = state.projects.update(&user.user_id, id, body.into_draft()?).await?;
    info!(user_id = %user.user_id, project_id = %project.id, "project updated");
    Ok(Json(project))
}

/// `DELETE /api/projects/{id}`
///
/// # Errors
/// Returns [`ApiError::NotFound`] for an id the caller does not own.
pub async fn delete_project(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    state.projects.delete(&user.user_id, id).await?;
    info!(user_id = %user.user_id, project_id = %id, "project deleted");
    Ok(Json(json!({"message": "Project deleted successfully"})))
}
