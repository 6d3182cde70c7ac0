//! Project model and request payloads.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Photo, PhotoInput, UserSummary};

// ============================================================================
// Project Type
// ============================================================================

/// Whether a project is shared with collaborators.
/// Always derived from the collaborator count, never supplied by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectType {
    Solo,
    Group,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Solo => "Solo",
            ProjectType::Group => "Group",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Solo" => Some(ProjectType::Solo),
            "Group" => Some(ProjectType::Group),
            _ => None,
        }
    }

    pub fn for_collaborator_count(count: usize) -> Self {
        if count > 0 {
            ProjectType::Group
        } else {
            ProjectType::Solo
        }
    }
}

// ============================================================================
// Project
// ============================================================================

/// A project row as stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "snake_case")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,

    /// 'Solo' or 'Group'
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub project_type: String,

    pub owner_id: String,
    pub photo_id: String,
    pub like_count: i64,

    pub created_at: String,
    pub updated_at: String,
}

impl Project {
    pub fn kind(&self) -> Option<ProjectType> {
        ProjectType::from_str(&self.project_type)
    }

    pub fn is_owner(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}

/// A project together with its photo and membership, as returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectAggregate {
    #[serde(flatten)]
    pub project: Project,
    pub photo: Photo,
    pub owner: UserSummary,
    pub collaborators: Vec<UserSummary>,
}

impl ProjectAggregate {
    pub fn collaborator_ids(&self) -> Vec<&str> {
        self.collaborators.iter().map(|c| c.id.as_str()).collect()
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// Raw project payload, as received from the caller.
///
/// Every field is optional so the validation gate can report exactly which
/// one is missing. `collaborators` stays untyped until validated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub owner_id: Option<String>,
    pub collaborators: Option<serde_json::Value>,
}

/// A payload that passed the validation gate.
#[derive(Debug, Clone)]
pub struct ValidatedProject {
    /// Trimmed, first letter capitalized.
    pub title: String,
    pub description: String,
    pub photo: PhotoInput,
    pub owner_id: String,
    pub collaborators: CollaboratorSet,
}

impl ValidatedProject {
    pub fn project_type(&self) -> ProjectType {
        ProjectType::for_collaborator_count(self.collaborators.len())
    }
}

// ============================================================================
// Collaborator Set
// ============================================================================

/// A duplicate-free set of user IDs that remembers insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollaboratorSet {
    order: Vec<String>,
    members: HashSet<String>,
}

impl CollaboratorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set, returning the first repeated ID if any.
    pub fn try_from_ids<I, S>(ids: I) -> std::result::Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for id in ids {
            let id = id.into();
            if !set.insert(id.clone()) {
                return Err(id);
            }
        }
        Ok(set)
    }

    /// Insert an ID. Returns false if it was already present.
    pub fn insert(&mut self, id: String) -> bool {
        if self.members.contains(&id) {
            return false;
        }
        self.members.insert(id.clone());
        self.order.push(id);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

impl FromIterator<String> for CollaboratorSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

/// What an edit changed, for logging and callers that care.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditSummary {
    pub photo_replaced: bool,
    pub collaborators_added: Vec<String>,
    pub collaborators_removed: Vec<String>,
}
