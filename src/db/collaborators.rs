//! Project collaborator membership queries.
//!
//! Membership is a bare (project, user) relation. Rows are only written
//! as part of a project create, edit, or delete unit of work.

use crate::Result;
use sqlx::{Executor, Sqlite, SqliteConnection};

use crate::models::UserSummary;

/// List the collaborators of a project, oldest membership first.
pub async fn list_project_collaborators<'e, E>(
    executor: E,
    project_id: &str,
) -> Result<Vec<UserSummary>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let collaborators = sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT u.id, u.username, u.display_name
        FROM project_collaborators pc
        INNER JOIN users u ON pc.user_id = u.id
        WHERE pc.project_id = ?
        ORDER BY pc.created_at ASC, pc.rowid ASC
        "#,
    )
    .bind(project_id)
    .fetch_all(executor)
    .await?;

    Ok(collaborators)
}

/// List only the collaborator IDs of a project, oldest membership first.
pub async fn list_collaborator_ids<'e, E>(executor: E, project_id: &str) -> Result<Vec<String>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let ids: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT user_id FROM project_collaborators
        WHERE project_id = ?
        ORDER BY created_at ASC, rowid ASC
        "#,
    )
    .bind(project_id)
    .fetch_all(executor)
    .await?;

    Ok(ids.into_iter().map(|(id,)| id).collect())
}

/// Add a collaborator to a project.
pub async fn insert_collaborator(
    conn: &mut SqliteConnection,
    project_id: &str,
    user_id: &str,
) -> Result<()> {
    sqlx::query("INSERT INTO project_collaborators (project_id, user_id) VALUES (?, ?)")
        .bind(project_id)
        .bind(user_id)
        .execute(conn)
        .await?;

    Ok(())
}

/// Remove a collaborator from a project. Returns whether a row was removed.
pub async fn delete_collaborator(
    conn: &mut SqliteConnection,
    project_id: &str,
    user_id: &str,
) -> Result<bool> {
    let result =
        sqlx::query("DELETE FROM project_collaborators WHERE project_id = ? AND user_id = ?")
            .bind(project_id)
            .bind(user_id)
            .execute(conn)
            .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove every collaborator of a project. Returns the number of rows removed.
pub async fn delete_project_collaborators(
    conn: &mut SqliteConnection,
    project_id: &str,
) -> Result<u64> {
    let result = sqlx::query("DELETE FROM project_collaborators WHERE project_id = ?")
        .bind(project_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected())
}
