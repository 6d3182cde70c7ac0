//! Photo database queries.

use crate::Result;
use sqlx::{Executor, Sqlite, SqliteConnection};

use crate::models::{Photo, PhotoInput};

/// Get a photo by ID.
pub async fn get_photo<'e, E>(executor: E, photo_id: &str) -> Result<Option<Photo>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let photo = sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE id = ?")
        .bind(photo_id)
        .fetch_optional(executor)
        .await?;

    Ok(photo)
}

/// Insert a photo row.
pub async fn insert_photo(
    conn: &mut SqliteConnection,
    id: &str,
    input: &PhotoInput,
) -> Result<Photo> {
    let photo = sqlx::query_as::<_, Photo>(
        r#"
        INSERT INTO photos (id, image, checksum, width, height)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.image)
    .bind(input.checksum())
    .bind(input.width)
    .bind(input.height)
    .fetch_one(conn)
    .await?;

    Ok(photo)
}

/// Delete a photo row. Returns whether a row was removed.
pub async fn delete_photo(conn: &mut SqliteConnection, photo_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM photos WHERE id = ?")
        .bind(photo_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}
