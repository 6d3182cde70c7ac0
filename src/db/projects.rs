//! Project database queries.
//!
//! Projects reference exactly one photo and one owner. The derived
//! `type` column is written by the lifecycle manager, never by callers.

use crate::{Error, Result};
use sqlx::{Executor, Sqlite, SqliteConnection};

use super::{get_photo, get_user_summary, list_project_collaborators};
use crate::models::{Project, ProjectAggregate, ProjectType};

// ============================================================================
// Types
// ============================================================================

/// Input for inserting a project row.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub id: String,
    pub title: String,
    pub description: String,
    pub project_type: ProjectType,
    pub owner_id: String,
    pub photo_id: String,
}

/// Input for rewriting the mutable columns of a project row.
#[derive(Debug, Clone)]
pub struct UpdateProject {
    pub title: String,
    pub description: String,
    pub project_type: ProjectType,
    pub photo_id: String,
}

// ============================================================================
// Reads
// ============================================================================

/// Get a project by ID.
pub async fn get_project<'e, E>(executor: E, id: &str) -> Result<Option<Project>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(project)
}

/// List projects a user owns or collaborates on, newest first.
pub async fn list_projects_for_user<'e, E>(executor: E, user_id: &str) -> Result<Vec<Project>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let projects = sqlx::query_as::<_, Project>(
        r#"
        SELECT p.* FROM projects p
        WHERE p.owner_id = ?
           OR EXISTS (
               SELECT 1 FROM project_collaborators pc
               WHERE pc.project_id = p.id AND pc.user_id = ?
           )
        ORDER BY p.created_at DESC, p.rowid DESC
        "#,
    )
    .bind(user_id)
    .bind(user_id)
    .fetch_all(executor)
    .await?;

    Ok(projects)
}

/// Load a project with its photo, owner and collaborators.
///
/// All reads run on the given connection, so inside a unit of work they
/// observe that unit's uncommitted writes.
pub async fn load_project_aggregate(
    conn: &mut SqliteConnection,
    id: &str,
) -> Result<Option<ProjectAggregate>> {
    let Some(project) = get_project(&mut *conn, id).await? else {
        return Ok(None);
    };

    let photo = get_photo(&mut *conn, &project.photo_id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Project {} references a missing photo", id)))?;

    let owner = get_user_summary(&mut *conn, &project.owner_id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Project {} references a missing owner", id)))?;

    let collaborators = list_project_collaborators(&mut *conn, id).await?;

    Ok(Some(ProjectAggregate {
        project,
        photo,
        owner,
        collaborators,
    }))
}

// ============================================================================
// Writes
// ============================================================================

/// Insert a project row.
pub async fn insert_project(conn: &mut SqliteConnection, input: &CreateProject) -> Result<Project> {
    let project = sqlx::query_as::<_, Project>(
        r#"
        INSERT INTO projects (id, title, description, type, owner_id, photo_id)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&input.id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.project_type.as_str())
    .bind(&input.owner_id)
    .bind(&input.photo_id)
    .fetch_one(conn)
    .await?;

    Ok(project)
}

/// Rewrite the mutable columns of a project. The owner never changes.
pub async fn update_project(
    conn: &mut SqliteConnection,
    id: &str,
    input: &UpdateProject,
) -> Result<Project> {
    sqlx::query_as::<_, Project>(
        r#"
        UPDATE projects SET
            title = ?,
            description = ?,
            type = ?,
            photo_id = ?,
            updated_at = datetime('now')
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.project_type.as_str())
    .bind(&input.photo_id)
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| Error::not_found("project", id))
}

/// Delete a project row. Collaborator rows must already be gone.
pub async fn delete_project(conn: &mut SqliteConnection, id: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM projects WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::not_found("project", id));
    }

    Ok(())
}
