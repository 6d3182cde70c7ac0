//! Collaborator set reconciliation.
//!
//! Computes the minimal membership delta between the persisted collaborator
//! set of a project and the set an edit asks for.

use serde::Serialize;

use crate::models::CollaboratorSet;

/// Rows to insert and delete to turn one collaborator set into another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollaboratorDelta {
    /// `requested - current`, in requested order.
    pub to_add: Vec<String>,
    /// `current - requested`, in current order.
    pub to_remove: Vec<String>,
}

impl CollaboratorDelta {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Whether the only change is `user_id` leaving the project.
    pub fn is_only_removal_of(&self, user_id: &str) -> bool {
        self.to_add.is_empty() && self.to_remove.len() == 1 && self.to_remove[0] == user_id
    }
}

/// Diff the current membership against the requested one.
///
/// `current` must be read from the store at the moment the edit's unit of
/// work begins, otherwise the delta may act on stale membership.
pub fn reconcile(current: &CollaboratorSet, requested: &CollaboratorSet) -> CollaboratorDelta {
    let to_add = requested
        .iter()
        .filter(|id| !current.contains(id))
        .map(str::to_string)
        .collect();

    let to_remove = current
        .iter()
        .filter(|id| !requested.contains(id))
        .map(str::to_string)
        .collect();

    CollaboratorDelta { to_add, to_remove }
}
