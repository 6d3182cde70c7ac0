//! Project lifecycle management.
//!
//! Creates, edits and deletes a project together with its photo and its
//! collaborator rows. Each operation validates first, then applies all of
//! its writes inside one [`UnitOfWork`]: either every row change lands or
//! none does.

use sqlx::SqliteConnection;
use tracing::{error, info};

use crate::config::ProjectRulesConfig;
use crate::db::{self, CreateProject, DbPool, UnitOfWork, UpdateProject};
use crate::error::{Error, Result};
use crate::models::{
    new_id, CollaboratorSet, EditSummary, Project, ProjectAggregate, ProjectPayload,
    ValidatedProject,
};

use super::collaborators::reconcile;
use super::permissions;
use super::photo;
use super::validation::{ValidatedEdit, ValidationGate};

/// Service for managing the project lifecycle.
#[derive(Clone)]
pub struct ProjectService {
    db: DbPool,
    gate: ValidationGate,
}

impl ProjectService {
    /// Create a new project service on the given store.
    pub fn new(db: DbPool, rules: ProjectRulesConfig) -> Self {
        let gate = ValidationGate::new(db.clone(), rules);
        Self { db, gate }
    }

    /// Publish a new project. Returns its ID.
    pub async fn post_project(&self, payload: ProjectPayload) -> Result<String> {
        let fields = self.gate.validate_create(&payload).await?;
        let project_id = new_id();

        let mut uow = UnitOfWork::begin(&self.db).await?;
        let outcome = apply_create(uow.conn(), &project_id, &fields).await;
        finish(uow, "create", &project_id, outcome).await?;

        info!(
            project_id = %project_id,
            owner_id = %fields.owner_id,
            collaborators = fields.collaborators.len(),
            project_type = fields.project_type().as_str(),
            "Created project"
        );

        Ok(project_id)
    }

    /// Edit a project on behalf of `editor_id` and return its fresh state.
    pub async fn edit_project(
        &self,
        project_id: &str,
        payload: ProjectPayload,
        editor_id: &str,
    ) -> Result<ProjectAggregate> {
        let (aggregate, _) = self
            .edit_project_with_summary(project_id, payload, editor_id)
            .await?;
        Ok(aggregate)
    }

    /// Like [`edit_project`](Self::edit_project), also reporting what changed.
    pub async fn edit_project_with_summary(
        &self,
        project_id: &str,
        payload: ProjectPayload,
        editor_id: &str,
    ) -> Result<(ProjectAggregate, EditSummary)> {
        let edit = self
            .gate
            .validate_edit(project_id, &payload, editor_id)
            .await?;

        let mut uow = UnitOfWork::begin(&self.db).await?;
        let outcome = apply_edit(uow.conn(), &edit, editor_id).await;
        let summary = finish(uow, "edit", project_id, outcome).await?;

        info!(
            project_id = %project_id,
            editor_id = %editor_id,
            role = edit.role.as_str(),
            photo_replaced = summary.photo_replaced,
            added = summary.collaborators_added.len(),
            removed = summary.collaborators_removed.len(),
            "Edited project"
        );

        let aggregate = self.get(project_id).await?;
        Ok((aggregate, summary))
    }

    /// Delete a project, its photo and its memberships.
    pub async fn delete_project(&self, project_id: &str, owner_id: &str) -> Result<()> {
        let project = self.gate.validate_delete(project_id, owner_id).await?;

        let mut uow = UnitOfWork::begin(&self.db).await?;
        let outcome = apply_delete(uow.conn(), &project).await;
        let removed = finish(uow, "delete", project_id, outcome).await?;

        info!(
            project_id = %project_id,
            owner_id = %owner_id,
            collaborators_removed = removed,
            "Deleted project"
        );

        Ok(())
    }

    /// Get a project with its photo, owner and collaborators.
    pub async fn get(&self, project_id: &str) -> Result<ProjectAggregate> {
        let mut conn = self.db.acquire().await?;
        db::load_project_aggregate(&mut conn, project_id)
            .await?
            .ok_or_else(|| Error::not_found("project", project_id))
    }

    /// List the projects a user owns or collaborates on.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<ProjectAggregate>> {
        let mut conn = self.db.acquire().await?;

        if !db::user_exists(&mut *conn, user_id).await? {
            return Err(Error::not_found("user", user_id));
        }

        let projects = db::list_projects_for_user(&mut *conn, user_id).await?;
        let mut aggregates = Vec::with_capacity(projects.len());
        for project in projects {
            if let Some(aggregate) = db::load_project_aggregate(&mut conn, &project.id).await? {
                aggregates.push(aggregate);
            }
        }

        Ok(aggregates)
    }
}

// ============================================================================
// Unit of Work Bodies
// ============================================================================

/// Commit on success, roll back on failure.
///
/// Validation and policy errors keep their kind. Store failures are logged
/// with their cause and surfaced as a transaction failure.
async fn finish<T>(uow: UnitOfWork, operation: &str, project_id: &str, outcome: Result<T>) -> Result<T> {
    match outcome {
        Ok(value) => match uow.commit().await {
            Ok(()) => Ok(value),
            Err(e) => {
                error!(operation, project_id = %project_id, error = %e, "Commit failed");
                Err(Error::Transaction(format!("{} could not be committed", operation)))
            }
        },
        Err(e) => {
            uow.rollback().await;
            if e.is_validation() {
                info!(operation, project_id = %project_id, error = %e, "Rejected inside unit of work, rolled back");
                Err(e)
            } else {
                error!(operation, project_id = %project_id, error = %e, "Unit of work failed, rolled back");
                Err(Error::Transaction(format!("{} failed", operation)))
            }
        }
    }
}

async fn apply_create(
    conn: &mut SqliteConnection,
    project_id: &str,
    fields: &ValidatedProject,
) -> Result<()> {
    let attached = photo::upsert_photo(&mut *conn, None, &fields.photo).await?;

    db::insert_project(
        &mut *conn,
        &CreateProject {
            id: project_id.to_string(),
            title: fields.title.clone(),
            description: fields.description.clone(),
            project_type: fields.project_type(),
            owner_id: fields.owner_id.clone(),
            photo_id: attached.photo_id,
        },
    )
    .await?;

    for user_id in fields.collaborators.iter() {
        db::insert_collaborator(&mut *conn, project_id, user_id).await?;
    }

    Ok(())
}

async fn apply_edit(
    conn: &mut SqliteConnection,
    edit: &ValidatedEdit,
    editor_id: &str,
) -> Result<EditSummary> {
    let project_id = edit.project.id.as_str();
    let fields = &edit.fields;

    // Re-read inside the transaction so the delta reflects persisted state
    let project = db::get_project(&mut *conn, project_id)
        .await?
        .ok_or_else(|| Error::not_found("project", project_id))?;
    let current_photo = db::get_photo(&mut *conn, &project.photo_id).await?;
    let current: CollaboratorSet = db::list_collaborator_ids(&mut *conn, project_id)
        .await?
        .into_iter()
        .collect();

    let role = permissions::require_role(&project, &current, editor_id)?;
    let delta = reconcile(&current, &fields.collaborators);
    permissions::check_edit(role, &delta, editor_id)?;

    let attached = photo::upsert_photo(&mut *conn, current_photo.as_ref(), &fields.photo).await?;

    db::update_project(
        &mut *conn,
        project_id,
        &UpdateProject {
            title: fields.title.clone(),
            description: fields.description.clone(),
            project_type: fields.project_type(),
            photo_id: attached.photo_id.clone(),
        },
    )
    .await?;

    if let Some(old_photo_id) = attached.superseded.as_deref() {
        photo::delete_photo(&mut *conn, old_photo_id).await?;
    }

    for user_id in &delta.to_add {
        db::insert_collaborator(&mut *conn, project_id, user_id).await?;
    }
    for user_id in &delta.to_remove {
        db::delete_collaborator(&mut *conn, project_id, user_id).await?;
    }

    Ok(EditSummary {
        photo_replaced: attached.did_replace(),
        collaborators_added: delta.to_add,
        collaborators_removed: delta.to_remove,
    })
}

/// Returns the number of collaborator rows removed.
async fn apply_delete(conn: &mut SqliteConnection, project: &Project) -> Result<u64> {
    let removed = db::delete_project_collaborators(&mut *conn, &project.id).await?;
    db::delete_project(&mut *conn, &project.id).await?;
    // The project row referenced the photo, so it goes last
    photo::delete_photo(&mut *conn, &project.photo_id).await?;
    Ok(removed)
}
