//! Common test utilities and helpers.

#![allow(dead_code)]

use serde_json::{json, Value};
use showcase::config::ProjectRulesConfig;
use showcase::db::{self, CreateUser, DbPool};
use showcase::models::ProjectPayload;
use showcase::services::ProjectService;

pub const OWNER: &str = "owner";
pub const ALICE: &str = "alice";
pub const BOB: &str = "bob";
pub const CAROL: &str = "carol";

pub const IMAGE_A: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAAB";
pub const IMAGE_B: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAIAAAAC";

/// Create an in-memory database with the schema and four users.
pub async fn setup_test_db() -> DbPool {
    let pool = db::init_memory_db()
        .await
        .expect("Failed to create test database");

    for id in [OWNER, ALICE, BOB, CAROL] {
        db::create_user(
            &pool,
            &CreateUser {
                id: id.to_string(),
                username: id.to_string(),
                display_name: Some(format!("{} (display)", id)),
            },
        )
        .await
        .expect("Failed to create test user");
    }

    pool
}

pub async fn setup_service() -> (ProjectService, DbPool) {
    let pool = setup_test_db().await;
    let service = ProjectService::new(pool.clone(), ProjectRulesConfig::default());
    (service, pool)
}

/// A complete, valid payload owned by OWNER.
pub fn payload(title: &str, image: &str, collaborators: Value) -> ProjectPayload {
    ProjectPayload {
        title: Some(title.to_string()),
        description: Some("Built over a weekend".to_string()),
        image: Some(image.to_string()),
        width: Some(1280),
        height: Some(720),
        owner_id: Some(OWNER.to_string()),
        collaborators: Some(collaborators),
    }
}

pub fn json_payload(title: &str, collaborators: Value) -> Value {
    json!({
        "title": title,
        "description": "Built over a weekend",
        "image": IMAGE_A,
        "width": 1280,
        "height": 720,
        "owner_id": OWNER,
        "collaborators": collaborators,
    })
}

pub async fn count(pool: &DbPool, table: &str) -> i64 {
    let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .expect("count query failed");
    n
}

/// Photos not referenced by any project.
pub async fn orphan_photos(pool: &DbPool) -> i64 {
    let (n,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM photos WHERE id NOT IN (SELECT photo_id FROM projects)",
    )
    .fetch_one(pool)
    .await
    .expect("orphan query failed");
    n
}

/// Projects whose stored type disagrees with their collaborator count.
pub async fn inconsistent_types(pool: &DbPool) -> i64 {
    let (n,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM projects p
        WHERE p.type != CASE
            WHEN (SELECT COUNT(*) FROM project_collaborators pc WHERE pc.project_id = p.id) > 0
            THEN 'Group' ELSE 'Solo' END
        "#,
    )
    .fetch_one(pool)
    .await
    .expect("type query failed");
    n
}

/// Make every statement of the given kind on `table` fail.
pub async fn inject_fault(pool: &DbPool, when: &str, table: &str) {
    let sql = format!(
        "CREATE TRIGGER fault_{}_{} BEFORE {} ON {} BEGIN SELECT RAISE(ABORT, 'injected fault'); END",
        when.to_lowercase(),
        table,
        when,
        table
    );
    sqlx::query(&sql)
        .execute(pool)
        .await
        .expect("Failed to install fault trigger");
}

/// Record every photo insert and delete into `photo_audit`.
pub async fn audit_photos(pool: &DbPool) {
    for sql in [
        "CREATE TABLE photo_audit (op TEXT NOT NULL, photo_id TEXT NOT NULL)",
        "CREATE TRIGGER audit_photo_insert AFTER INSERT ON photos BEGIN INSERT INTO photo_audit VALUES ('insert', NEW.id); END",
        "CREATE TRIGGER audit_photo_delete AFTER DELETE ON photos BEGIN INSERT INTO photo_audit VALUES ('delete', OLD.id); END",
    ] {
        sqlx::query(sql)
            .execute(pool)
            .await
            .expect("Failed to install audit trigger");
    }
}

pub async fn audited(pool: &DbPool, op: &str) -> i64 {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM photo_audit WHERE op = ?")
        .bind(op)
        .fetch_one(pool)
        .await
        .expect("audit query failed");
    n
}

pub async fn clear_audit(pool: &DbPool) {
    sqlx::query("DELETE FROM photo_audit")
        .execute(pool)
        .await
        .expect("Failed to clear audit");
}
