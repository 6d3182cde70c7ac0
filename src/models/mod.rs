//! Data models for Showcase.
//!
//! Defines the core types used throughout the system including
//! projects, photos, users, and request payloads.

mod photo;
mod project;
mod user;

pub use photo::*;
pub use project::*;
pub use user::*;

use uuid::Uuid;

/// Generate a new UUID
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
