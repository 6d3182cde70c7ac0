//! Service layer for Showcase.
//!
//! Contains the business logic of the project lifecycle:
//! - Project (create/edit/delete orchestration under one unit of work)
//! - Validation (field, length, existence and business-rule checks)
//! - Permissions (owner vs. collaborator authorization policy)
//! - Collaborators (membership set reconciliation)
//! - Photo (attached image create/replace/delete)

pub mod collaborators;
pub mod permissions;
pub mod photo;
mod project;
pub mod validation;

pub use collaborators::{reconcile, CollaboratorDelta};
pub use photo::PhotoUpsert;
pub use project::ProjectService;
pub use validation::{ValidatedEdit, ValidationGate};
