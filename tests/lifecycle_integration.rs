//! Integration tests for the project lifecycle.
//!
//! Runs create, edit and delete against an in-memory SQLite store. Store
//! failures are injected with `RAISE(ABORT)` triggers so rollback can be
//! observed from the outside.

mod common;

use common::*;
use serde_json::json;
use showcase::models::ProjectType;
use showcase::Error;

// ============================================================================
// Scenario
// ============================================================================

#[tokio::test]
async fn test_solo_to_group_and_back() {
    let (service, pool) = setup_service().await;

    // Create: title normalized, no collaborators
    let id = service
        .post_project(payload("my space project", IMAGE_A, json!([])))
        .await
        .unwrap();
    let project = service.get(&id).await.unwrap();
    assert_eq!(project.project.title, "My space project");
    assert_eq!(project.project.kind(), Some(ProjectType::Solo));

    // Owner adds two collaborators
    let (project, summary) = service
        .edit_project_with_summary(&id, payload("my space project", IMAGE_A, json!([ALICE, BOB])), OWNER)
        .await
        .unwrap();
    assert_eq!(project.project.kind(), Some(ProjectType::Group));
    assert_eq!(summary.collaborators_added, vec![ALICE, BOB]);
    assert!(summary.collaborators_removed.is_empty());
    assert_eq!(count(&pool, "project_collaborators").await, 2);

    // Alice leaves; Bob stays, still a group
    let (project, summary) = service
        .edit_project_with_summary(&id, payload("my space project", IMAGE_A, json!([BOB])), ALICE)
        .await
        .unwrap();
    assert_eq!(summary.collaborators_removed, vec![ALICE]);
    assert!(summary.collaborators_added.is_empty());
    assert_eq!(project.collaborator_ids(), vec![BOB]);
    assert_eq!(project.project.kind(), Some(ProjectType::Group));

    // Bob leaves too; the project is solo again
    let project = service
        .edit_project(&id, payload("my space project", IMAGE_A, json!([])), BOB)
        .await
        .unwrap();
    assert!(project.collaborators.is_empty());
    assert_eq!(project.project.kind(), Some(ProjectType::Solo));

    assert_eq!(inconsistent_types(&pool).await, 0);
    assert_eq!(orphan_photos(&pool).await, 0);
}

#[tokio::test]
async fn test_owner_and_dates_survive_edits() {
    let (service, _pool) = setup_service().await;

    let id = service
        .post_project(payload("first", IMAGE_A, json!([ALICE])))
        .await
        .unwrap();
    let before = service.get(&id).await.unwrap();

    let after = service
        .edit_project(&id, payload("second", IMAGE_A, json!([ALICE])), ALICE)
        .await
        .unwrap();

    assert_eq!(after.project.title, "Second");
    assert_eq!(after.project.owner_id, OWNER);
    assert_eq!(after.owner.id, OWNER);
    assert_eq!(after.project.created_at, before.project.created_at);
    assert_eq!(after.project.like_count, 0);
}

// ============================================================================
// Authorization
// ============================================================================

#[tokio::test]
async fn test_collaborator_membership_rules() {
    let (service, pool) = setup_service().await;
    let id = service
        .post_project(payload("team", IMAGE_A, json!([ALICE, BOB])))
        .await
        .unwrap();

    // Adding anyone is forbidden
    let result = service
        .edit_project(&id, payload("team", IMAGE_A, json!([ALICE, BOB, CAROL])), ALICE)
        .await;
    assert!(matches!(result, Err(Error::Forbidden(_))));

    // Removing someone else is forbidden
    let result = service
        .edit_project(&id, payload("team", IMAGE_A, json!([ALICE])), ALICE)
        .await;
    assert!(matches!(result, Err(Error::Forbidden(_))));

    // Resubmitting the same set in another order is fine
    service
        .edit_project(&id, payload("team", IMAGE_A, json!([BOB, ALICE])), ALICE)
        .await
        .unwrap();

    // Nothing from the rejected edits was written
    let project = service.get(&id).await.unwrap();
    assert_eq!(project.collaborators.len(), 2);
    assert_eq!(count(&pool, "project_collaborators").await, 2);

    // Leaving is fine
    let project = service
        .edit_project(&id, payload("team", IMAGE_A, json!([BOB])), ALICE)
        .await
        .unwrap();
    assert_eq!(project.collaborator_ids(), vec![BOB]);

    // Once gone, Alice can no longer edit
    let result = service
        .edit_project(&id, payload("team", IMAGE_A, json!([BOB])), ALICE)
        .await;
    assert!(matches!(result, Err(Error::Forbidden(_))));
}

#[tokio::test]
async fn test_owner_controls_membership() {
    let (service, _pool) = setup_service().await;
    let id = service
        .post_project(payload("team", IMAGE_A, json!([ALICE, BOB])))
        .await
        .unwrap();

    let project = service
        .edit_project(&id, payload("team", IMAGE_A, json!([CAROL, BOB])), OWNER)
        .await
        .unwrap();

    let mut ids = project.collaborator_ids();
    ids.sort();
    assert_eq!(ids, vec![BOB, CAROL]);
}

#[tokio::test]
async fn test_edit_rejects_unknown_editor_and_project() {
    let (service, _pool) = setup_service().await;
    let id = service
        .post_project(payload("p", IMAGE_A, json!([])))
        .await
        .unwrap();

    let result = service
        .edit_project(&id, payload("p", IMAGE_A, json!([])), "ghost")
        .await;
    assert!(matches!(result, Err(Error::NotFound(_))));

    let result = service
        .edit_project("missing", payload("p", IMAGE_A, json!([])), OWNER)
        .await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_edit_cannot_add_owner_or_unknown_user() {
    let (service, _pool) = setup_service().await;
    let id = service
        .post_project(payload("p", IMAGE_A, json!([])))
        .await
        .unwrap();

    let result = service
        .edit_project(&id, payload("p", IMAGE_A, json!([OWNER])), OWNER)
        .await;
    assert!(matches!(result, Err(Error::InvalidCollaboratorSet(_))));

    let result = service
        .edit_project(&id, payload("p", IMAGE_A, json!(["ghost"])), OWNER)
        .await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_create_validation_writes_nothing() {
    let (service, pool) = setup_service().await;

    let mut missing_owner = payload("p", IMAGE_A, json!([]));
    missing_owner.owner_id = None;
    assert!(matches!(
        service.post_project(missing_owner).await,
        Err(Error::MissingField("owner_id"))
    ));

    let mut unknown_owner = payload("p", IMAGE_A, json!([]));
    unknown_owner.owner_id = Some("ghost".into());
    assert!(matches!(
        service.post_project(unknown_owner).await,
        Err(Error::NotFound(_))
    ));

    let long_title = "x".repeat(41);
    assert!(matches!(
        service.post_project(payload(&long_title, IMAGE_A, json!([]))).await,
        Err(Error::FieldTooLong { .. })
    ));

    assert!(matches!(
        service.post_project(payload("p", IMAGE_A, json!([ALICE, ALICE]))).await,
        Err(Error::InvalidCollaboratorSet(_))
    ));

    assert!(matches!(
        service.post_project(payload("p", IMAGE_A, json!({"alice": true}))).await,
        Err(Error::InvalidCollaboratorSet(_))
    ));

    assert_eq!(count(&pool, "projects").await, 0);
    assert_eq!(count(&pool, "photos").await, 0);
    assert_eq!(count(&pool, "project_collaborators").await, 0);
}

#[tokio::test]
async fn test_omitted_collaborators_leave_membership_untouched() {
    let (service, pool) = setup_service().await;
    let id = service
        .post_project(payload("team", IMAGE_A, json!([ALICE, BOB])))
        .await
        .unwrap();

    for editor in [OWNER, ALICE] {
        let mut edit = payload("renamed", IMAGE_A, json!([]));
        edit.collaborators = None;
        assert!(matches!(
            service.edit_project(&id, edit, editor).await,
            Err(Error::MissingField("collaborators"))
        ));
    }

    let mut edit = payload("renamed", IMAGE_A, json!([]));
    edit.collaborators = Some(serde_json::Value::Null);
    assert!(matches!(
        service.edit_project(&id, edit, OWNER).await,
        Err(Error::MissingField("collaborators"))
    ));

    let project = service.get(&id).await.unwrap();
    assert_eq!(project.project.title, "Team");
    assert_eq!(project.project.kind(), Some(ProjectType::Group));
    assert_eq!(project.collaborator_ids(), vec![ALICE, BOB]);
    assert_eq!(count(&pool, "project_collaborators").await, 2);
}

#[tokio::test]
async fn test_create_requires_collaborator_list() {
    let (service, pool) = setup_service().await;

    let mut missing = payload("p", IMAGE_A, json!([]));
    missing.collaborators = None;
    assert!(matches!(
        service.post_project(missing).await,
        Err(Error::MissingField("collaborators"))
    ));
    assert_eq!(count(&pool, "projects").await, 0);
    assert_eq!(count(&pool, "photos").await, 0);
}

// ============================================================================
// Photo Dedup
// ============================================================================

#[tokio::test]
async fn test_unchanged_image_touches_no_photo_rows() {
    let (service, pool) = setup_service().await;
    audit_photos(&pool).await;

    let id = service
        .post_project(payload("p", IMAGE_A, json!([])))
        .await
        .unwrap();
    let before = service.get(&id).await.unwrap();
    clear_audit(&pool).await;

    let (after, summary) = service
        .edit_project_with_summary(&id, payload("renamed", IMAGE_A, json!([])), OWNER)
        .await
        .unwrap();

    assert!(!summary.photo_replaced);
    assert_eq!(after.photo.id, before.photo.id);
    assert_eq!(audited(&pool, "insert").await, 0);
    assert_eq!(audited(&pool, "delete").await, 0);
}

#[tokio::test]
async fn test_changed_image_replaces_exactly_one_photo() {
    let (service, pool) = setup_service().await;
    audit_photos(&pool).await;

    let id = service
        .post_project(payload("p", IMAGE_A, json!([])))
        .await
        .unwrap();
    let before = service.get(&id).await.unwrap();
    clear_audit(&pool).await;

    let (after, summary) = service
        .edit_project_with_summary(&id, payload("p", IMAGE_B, json!([])), OWNER)
        .await
        .unwrap();

    assert!(summary.photo_replaced);
    assert_ne!(after.photo.id, before.photo.id);
    assert_eq!(after.photo.image, IMAGE_B);
    assert_eq!(audited(&pool, "insert").await, 1);
    assert_eq!(audited(&pool, "delete").await, 1);
    assert_eq!(count(&pool, "photos").await, 1);
    assert_eq!(orphan_photos(&pool).await, 0);
}

// ============================================================================
// Atomicity
// ============================================================================

#[tokio::test]
async fn test_create_rolls_back_when_last_write_fails() {
    let (service, pool) = setup_service().await;
    inject_fault(&pool, "INSERT", "project_collaborators").await;

    let result = service
        .post_project(payload("p", IMAGE_A, json!([ALICE, BOB])))
        .await;
    assert!(matches!(result, Err(Error::Transaction(_))));

    assert_eq!(count(&pool, "projects").await, 0);
    assert_eq!(count(&pool, "photos").await, 0);
    assert_eq!(count(&pool, "project_collaborators").await, 0);
}

#[tokio::test]
async fn test_edit_rolls_back_when_last_write_fails() {
    let (service, pool) = setup_service().await;
    let id = service
        .post_project(payload("original", IMAGE_A, json!([ALICE])))
        .await
        .unwrap();
    let before = service.get(&id).await.unwrap();

    // Removing Alice is the final statement of this edit
    inject_fault(&pool, "DELETE", "project_collaborators").await;

    let result = service
        .edit_project(&id, payload("changed", IMAGE_B, json!([BOB])), OWNER)
        .await;
    assert!(matches!(result, Err(Error::Transaction(_))));

    let after = service.get(&id).await.unwrap();
    assert_eq!(after.project.title, "Original");
    assert_eq!(after.photo.id, before.photo.id);
    assert_eq!(after.photo.image, IMAGE_A);
    assert_eq!(after.collaborator_ids(), vec![ALICE]);
    assert_eq!(count(&pool, "photos").await, 1);
    assert_eq!(inconsistent_types(&pool).await, 0);
}

#[tokio::test]
async fn test_delete_rolls_back_when_last_write_fails() {
    let (service, pool) = setup_service().await;
    let id = service
        .post_project(payload("p", IMAGE_A, json!([ALICE, BOB])))
        .await
        .unwrap();

    // The photo row is removed last
    inject_fault(&pool, "DELETE", "photos").await;

    let result = service.delete_project(&id, OWNER).await;
    assert!(matches!(result, Err(Error::Transaction(_))));

    let project = service.get(&id).await.unwrap();
    assert_eq!(project.collaborators.len(), 2);
    assert_eq!(count(&pool, "photos").await, 1);
}

#[tokio::test]
async fn test_delete_by_unknown_user_is_not_found() {
    let (service, pool) = setup_service().await;
    let id = service
        .post_project(payload("p", IMAGE_A, json!([ALICE, BOB])))
        .await
        .unwrap();

    let result = service.delete_project(&id, "ghost").await;
    assert!(matches!(result, Err(Error::NotFound(_))));

    assert_eq!(count(&pool, "projects").await, 1);
    assert_eq!(count(&pool, "photos").await, 1);
    assert_eq!(count(&pool, "project_collaborators").await, 2);
    assert!(service.get(&id).await.is_ok());
}

#[tokio::test]
async fn test_delete_removes_every_row() {
    let (service, pool) = setup_service().await;
    let id = service
        .post_project(payload("p", IMAGE_A, json!([ALICE, BOB])))
        .await
        .unwrap();
    let keep = service
        .post_project(payload("q", IMAGE_B, json!([CAROL])))
        .await
        .unwrap();

    service.delete_project(&id, OWNER).await.unwrap();

    assert_eq!(count(&pool, "projects").await, 1);
    assert_eq!(count(&pool, "photos").await, 1);
    assert_eq!(count(&pool, "project_collaborators").await, 1);
    assert!(service.get(&keep).await.is_ok());

    assert!(matches!(
        service.delete_project(&id, OWNER).await,
        Err(Error::NotFound(_))
    ));
}
