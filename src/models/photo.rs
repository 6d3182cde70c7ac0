//! Photo model.
//!
//! The image is an opaque encoded string; only its exact bytes matter.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::FromRow;

/// A photo row as stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "snake_case")]
pub struct Photo {
    pub id: String,
    pub image: String,
    /// SHA-256 of `image`, hex encoded.
    pub checksum: String,
    pub width: i64,
    pub height: i64,
    pub created_at: String,
}

impl Photo {
    /// Byte-exact comparison against a requested payload.
    pub fn has_same_image(&self, requested: &PhotoInput) -> bool {
        self.checksum == requested.checksum() && self.image == requested.image
    }
}

/// A validated image payload with its original dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoInput {
    pub image: String,
    pub width: i64,
    pub height: i64,
}

impl PhotoInput {
    pub fn checksum(&self) -> String {
        image_checksum(&self.image)
    }
}

pub fn image_checksum(image: &str) -> String {
    hex::encode(Sha256::digest(image.as_bytes()))
}
