//! User models.
//!
//! Users are owned by the account system; the project core only reads them.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The public face of a user, as shown on a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "snake_case")]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
}

/// How an actor relates to a project they are trying to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectRole {
    Owner,
    Collaborator,
}

impl ProjectRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectRole::Owner => "owner",
            ProjectRole::Collaborator => "collaborator",
        }
    }
}
