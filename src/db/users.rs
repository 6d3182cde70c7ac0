//! User database queries.
//!
//! The account system owns user rows; the project core only checks that
//! referenced users exist and reads their public summaries.

use crate::Result;
use sqlx::{Executor, Sqlite};

use crate::models::UserSummary;

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
}

/// Create a user. Used for seeding and tests.
pub async fn create_user<'e, E>(executor: E, input: &CreateUser) -> Result<UserSummary>
where
    E: Executor<'e, Database = Sqlite>,
{
    let user = sqlx::query_as::<_, UserSummary>(
        r#"
        INSERT INTO users (id, username, display_name)
        VALUES (?, ?, ?)
        RETURNING id, username, display_name
        "#,
    )
    .bind(&input.id)
    .bind(&input.username)
    .bind(&input.display_name)
    .fetch_one(executor)
    .await?;

    Ok(user)
}

/// Check whether a user exists.
pub async fn user_exists<'e, E>(executor: E, user_id: &str) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let found: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

    Ok(found.is_some())
}

/// Get a user's public summary.
pub async fn get_user_summary<'e, E>(executor: E, user_id: &str) -> Result<Option<UserSummary>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let user = sqlx::query_as::<_, UserSummary>(
        "SELECT id, username, display_name FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await?;

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory_db;

    #[tokio::test]
    async fn test_create_and_get_user() {
        let pool = init_memory_db().await.unwrap();

        create_user(
            &pool,
            &CreateUser {
                id: "u-1".into(),
                username: "ada".into(),
                display_name: Some("Ada".into()),
            },
        )
        .await
        .unwrap();

        assert!(user_exists(&pool, "u-1").await.unwrap());
        assert!(!user_exists(&pool, "u-2").await.unwrap());

        let summary = get_user_summary(&pool, "u-1").await.unwrap().unwrap();
        assert_eq!(summary.username, "ada");
        assert_eq!(summary.display_name.as_deref(), Some("Ada"));
    }
}
