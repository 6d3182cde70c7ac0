//! Photo attachment lifecycle.
//!
//! A project owns exactly one photo. Editing with a byte-identical image
//! keeps the stored row; any other image gets a fresh row and the old one
//! is scheduled for deletion in the same unit of work.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::db;
use crate::error::{Error, Result};
use crate::models::{new_id, Photo, PhotoInput};

/// Result of attaching the requested image to a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpsert {
    /// The photo the project must reference afterwards.
    pub photo_id: String,
    /// The previous photo, when it was replaced. The caller deletes it
    /// once the project no longer references it.
    pub superseded: Option<String>,
}

impl PhotoUpsert {
    pub fn did_replace(&self) -> bool {
        self.superseded.is_some()
    }
}

/// Attach `requested`, reusing `current` when the image is unchanged.
pub async fn upsert_photo(
    conn: &mut SqliteConnection,
    current: Option<&Photo>,
    requested: &PhotoInput,
) -> Result<PhotoUpsert> {
    match current {
        Some(photo) if photo.has_same_image(requested) => {
            debug!(photo_id = %photo.id, "Image unchanged, keeping photo");
            Ok(PhotoUpsert {
                photo_id: photo.id.clone(),
                superseded: None,
            })
        }
        Some(photo) => {
            let created = db::insert_photo(conn, &new_id(), requested).await?;
            debug!(old = %photo.id, new = %created.id, "Image changed, replacing photo");
            Ok(PhotoUpsert {
                photo_id: created.id,
                superseded: Some(photo.id.clone()),
            })
        }
        None => {
            let created = db::insert_photo(conn, &new_id(), requested).await?;
            debug!(photo_id = %created.id, "Created photo");
            Ok(PhotoUpsert {
                photo_id: created.id,
                superseded: None,
            })
        }
    }
}

/// Delete a photo that nothing references any more.
///
/// A missing row means the project and its photo disagree, which is
/// reported as an internal error so the unit of work rolls back.
pub async fn delete_photo(conn: &mut SqliteConnection, photo_id: &str) -> Result<()> {
    if !db::delete_photo(conn, photo_id).await? {
        return Err(Error::Internal(format!("Photo {} was already gone", photo_id)));
    }
    debug!(photo_id = %photo_id, "Deleted photo");
    Ok(())
}
