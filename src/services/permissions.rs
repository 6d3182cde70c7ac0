//! Authorization policy for project changes.
//!
//! Decides what an actor may do to a project based on how they relate to it:
//! - Owner: any edit, any membership change, deletion
//! - Collaborator: content edits, and leaving the project themself
//! - Anyone else: nothing

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{CollaboratorSet, Project, ProjectRole};

use super::collaborators::CollaboratorDelta;

/// Work out how `actor_id` relates to `project`, given its current membership.
pub fn role_of(
    project: &Project,
    current: &CollaboratorSet,
    actor_id: &str,
) -> Option<ProjectRole> {
    if project.is_owner(actor_id) {
        Some(ProjectRole::Owner)
    } else if current.contains(actor_id) {
        Some(ProjectRole::Collaborator)
    } else {
        None
    }
}

/// Like [`role_of`], but rejects actors with no relation to the project.
pub fn require_role(
    project: &Project,
    current: &CollaboratorSet,
    actor_id: &str,
) -> Result<ProjectRole> {
    role_of(project, current, actor_id).ok_or_else(|| {
        debug!(project_id = %project.id, actor_id = %actor_id, "Actor is neither owner nor collaborator");
        Error::Forbidden("only the owner or a collaborator can edit this project".into())
    })
}

/// Check a membership change against the actor's role.
///
/// Must be given the reconciled delta, not the raw requested list, so a
/// collaborator resubmitting the unchanged set is always allowed.
pub fn check_edit(role: ProjectRole, delta: &CollaboratorDelta, actor_id: &str) -> Result<()> {
    let allowed = match role {
        ProjectRole::Owner => true,
        ProjectRole::Collaborator => delta.is_empty() || delta.is_only_removal_of(actor_id),
    };

    debug!(
        role = role.as_str(),
        actor_id = %actor_id,
        adding = delta.to_add.len(),
        removing = delta.to_remove.len(),
        allowed,
        "Checked membership change"
    );

    if allowed {
        return Ok(());
    }

    if !delta.to_add.is_empty() {
        Err(Error::Forbidden(
            "collaborators cannot add members to a project".into(),
        ))
    } else {
        Err(Error::Forbidden(
            "collaborators can only remove themselves from a project".into(),
        ))
    }
}

/// Only the stored owner may delete a project.
pub fn check_delete(project: &Project, requester_id: &str) -> Result<()> {
    if project.is_owner(requester_id) {
        Ok(())
    } else {
        debug!(project_id = %project.id, requester_id = %requester_id, "Delete by non-owner rejected");
        Err(Error::Forbidden("only the owner can delete this project".into()))
    }
}
