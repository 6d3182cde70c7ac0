//! API Routes for Showcase
//!
//! This module combines all API routes into a single router.
//! Handlers only translate between HTTP and the project service; every
//! rule lives in the service layer.

mod projects;
pub mod status;
mod users;

use axum::Router;

use crate::AppState;

/// Build the complete API router.
///
/// Route structure:
/// - /projects/* - Project lifecycle
/// - /users/:id/projects - Projects a user owns or collaborates on
/// - /health - Health check (public)
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(status::routes())
        .nest("/projects", projects::routes())
        .nest("/users", users::routes())
}
