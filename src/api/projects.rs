//! Projects Routes
//!
//! Lifecycle operations for project posts.
//!
//! Routes:
//! - POST /projects - Publish a project
//! - GET /projects/:id - Get project details
//! - PUT /projects/:id - Edit a project (owner or collaborator)
//! - DELETE /projects/:id - Delete a project (owner only)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::models::{ProjectAggregate, ProjectPayload};
use crate::{AppState, Error, Result};

/// Build project routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_project))
        .route(
            "/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to edit a project.
#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    /// The user making the edit
    pub editor_id: Option<String>,
    #[serde(flatten)]
    pub payload: ProjectPayload,
}

/// Request to delete a project.
#[derive(Debug, Deserialize)]
pub struct DeleteProjectRequest {
    pub owner_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
    pub id: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Publish a project.
///
/// POST /projects
async fn create_project(
    State(state): State<AppState>,
    Json(payload): Json<ProjectPayload>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let id = state.projects.post_project(payload).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// Get a project.
///
/// GET /projects/:id
async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProjectAggregate>> {
    Ok(Json(state.projects.get(&id).await?))
}

/// Edit a project.
///
/// PUT /projects/:id
async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectAggregate>> {
    let editor_id = request.editor_id.ok_or(Error::MissingField("editor_id"))?;
    let aggregate = state
        .projects
        .edit_project(&id, request.payload, &editor_id)
        .await?;
    Ok(Json(aggregate))
}

/// Delete a project.
///
/// DELETE /projects/:id
async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<DeleteProjectRequest>,
) -> Result<Json<DeletedResponse>> {
    let owner_id = request.owner_id.ok_or(Error::MissingField("owner_id"))?;
    state.projects.delete_project(&id, &owner_id).await?;
    Ok(Json(DeletedResponse { deleted: true, id }))
}
