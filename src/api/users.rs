//! User Routes
//!
//! Routes:
//! - GET /users/:id/projects - Projects the user owns or collaborates on

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::models::ProjectAggregate;
use crate::{AppState, Result};

/// Build user routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/:id/projects", get(list_user_projects))
}

#[derive(Debug, Serialize)]
pub struct UserProjectsResponse {
    pub projects: Vec<ProjectAggregate>,
    pub total: usize,
}

/// List a user's projects.
///
/// GET /users/:id/projects
async fn list_user_projects(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserProjectsResponse>> {
    let projects = state.projects.list_for_user(&user_id).await?;
    let total = projects.len();
    Ok(Json(UserProjectsResponse { projects, total }))
}
