//! Validation gate for project payloads.
//!
//! Runs every field, length, referential and business-rule check before a
//! unit of work opens. Nothing here writes; the only store access is
//! read-only existence checks.

use serde_json::Value;
use tracing::debug;

use crate::config::ProjectRulesConfig;
use crate::db::{self, DbPool};
use crate::error::{Error, Result};
use crate::models::{
    CollaboratorSet, PhotoInput, Project, ProjectPayload, ProjectRole, ValidatedProject,
};

use super::collaborators::reconcile;
use super::permissions;

/// An edit that passed validation, with the state it was checked against.
#[derive(Debug, Clone)]
pub struct ValidatedEdit {
    pub project: Project,
    pub role: ProjectRole,
    pub fields: ValidatedProject,
}

/// Field and store checks for create, edit and delete requests.
#[derive(Clone)]
pub struct ValidationGate {
    db: DbPool,
    rules: ProjectRulesConfig,
}

impl ValidationGate {
    pub fn new(db: DbPool, rules: ProjectRulesConfig) -> Self {
        Self { db, rules }
    }

    /// Validate a new project. The payload must name its owner.
    pub async fn validate_create(&self, payload: &ProjectPayload) -> Result<ValidatedProject> {
        let owner_id = required_str(&payload.owner_id, "owner_id")?;
        let fields = normalize_payload(payload, owner_id, &self.rules)?;

        self.ensure_user_exists(&fields.owner_id, "owner").await?;
        self.ensure_collaborators_exist(&fields.collaborators).await?;

        Ok(fields)
    }

    /// Validate an edit by `editor_id`, including the authorization check
    /// against the membership delta as currently persisted.
    ///
    /// The lifecycle manager repeats the membership read and the policy check
    /// inside its unit of work; this pass rejects bad requests before any
    /// transaction is opened.
    pub async fn validate_edit(
        &self,
        project_id: &str,
        payload: &ProjectPayload,
        editor_id: &str,
    ) -> Result<ValidatedEdit> {
        let project = db::get_project(&self.db, project_id)
            .await?
            .ok_or_else(|| Error::not_found("project", project_id))?;

        self.ensure_user_exists(editor_id, "editor").await?;

        let current: CollaboratorSet = db::list_collaborator_ids(&self.db, project_id)
            .await?
            .into_iter()
            .collect();
        let role = permissions::require_role(&project, &current, editor_id)?;

        if let Some(owner_id) = payload.owner_id.as_deref() {
            if owner_id.trim() != project.owner_id {
                return Err(Error::Forbidden("the owner of a project cannot change".into()));
            }
        }

        let fields = normalize_payload(payload, &project.owner_id, &self.rules)?;

        let delta = reconcile(&current, &fields.collaborators);
        permissions::check_edit(role, &delta, editor_id)?;

        // Users already on the project were checked when they were added
        for id in &delta.to_add {
            self.ensure_user_exists(id, "collaborator").await?;
        }

        Ok(ValidatedEdit {
            project,
            role,
            fields,
        })
    }

    /// Validate a deletion request: both records exist and the requester
    /// is the stored owner.
    pub async fn validate_delete(&self, project_id: &str, owner_id: &str) -> Result<Project> {
        let project = db::get_project(&self.db, project_id)
            .await?
            .ok_or_else(|| Error::not_found("project", project_id))?;

        self.ensure_user_exists(owner_id, "owner").await?;
        permissions::check_delete(&project, owner_id)?;

        Ok(project)
    }

    async fn ensure_user_exists(&self, user_id: &str, subject: &str) -> Result<()> {
        if db::user_exists(&self.db, user_id).await? {
            Ok(())
        } else {
            debug!(user_id = %user_id, subject, "Referenced user does not exist");
            Err(Error::not_found(subject, user_id))
        }
    }

    async fn ensure_collaborators_exist(&self, collaborators: &CollaboratorSet) -> Result<()> {
        for id in collaborators.iter() {
            self.ensure_user_exists(id, "collaborator").await?;
        }
        Ok(())
    }
}

// ============================================================================
// Field Checks
// ============================================================================

/// Presence, length and shape checks that need no store access.
pub fn normalize_payload(
    payload: &ProjectPayload,
    owner_id: &str,
    rules: &ProjectRulesConfig,
) -> Result<ValidatedProject> {
    let title = normalize_title(required_str(&payload.title, "title")?, rules.title_max_chars)?;

    let image = required_str(&payload.image, "image")?;
    let width = payload.width.ok_or(Error::MissingField("width"))?;
    let height = payload.height.ok_or(Error::MissingField("height"))?;
    if width <= 0 || height <= 0 {
        return Err(Error::InvalidInput(format!(
            "image dimensions must be positive, got {}x{}",
            width, height
        )));
    }

    let description = payload
        .description
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    let collaborators = parse_collaborators(payload.collaborators.as_ref(), owner_id)?;

    Ok(ValidatedProject {
        title,
        description,
        photo: PhotoInput {
            image: image.to_string(),
            width,
            height,
        },
        owner_id: owner_id.to_string(),
        collaborators,
    })
}

/// Trim, enforce the length limit, and capitalize the first letter.
pub fn normalize_title(raw: &str, max_chars: usize) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.chars().count() > max_chars {
        return Err(Error::FieldTooLong {
            field: "title",
            max: max_chars,
        });
    }

    let mut chars = trimmed.chars();
    Ok(match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    })
}

/// Turn the raw collaborator value into a set, enforcing that it is an
/// array of user IDs with no repeats and without the owner.
///
/// The list is required. `[]` is the only way to ask for no collaborators.
pub fn parse_collaborators(raw: Option<&Value>, owner_id: &str) -> Result<CollaboratorSet> {
    let items = match raw {
        None | Some(Value::Null) => return Err(Error::MissingField("collaborators")),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(Error::InvalidCollaboratorSet(
                "collaborators must be an array".into(),
            ))
        }
    };

    let mut set = CollaboratorSet::new();
    for item in items {
        let id = item.as_str().map(str::trim).ok_or_else(|| {
            Error::InvalidCollaboratorSet("collaborator IDs must be strings".into())
        })?;

        if id.is_empty() {
            return Err(Error::InvalidCollaboratorSet(
                "collaborator IDs must not be empty".into(),
            ));
        }
        if id == owner_id {
            return Err(Error::InvalidCollaboratorSet(
                "the owner cannot be a collaborator".into(),
            ));
        }
        if !set.insert(id.to_string()) {
            return Err(Error::InvalidCollaboratorSet(format!(
                "collaborator {} is listed more than once",
                id
            )));
        }
    }

    Ok(set)
}

fn required_str<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(Error::MissingField(field)),
    }
}
