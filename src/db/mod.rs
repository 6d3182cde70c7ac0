//! Database layer for Showcase.
//!
//! Provides SQLite connection pooling, the transactional unit of work,
//! and query modules for every table the project core touches.
//!
//! Read helpers are generic over any sqlx executor so they run either on
//! the pool or on a connection inside an open unit of work. Write helpers
//! take a connection and are only called from inside a unit of work.

mod collaborators;
mod photos;
mod pool;
mod projects;
mod unit_of_work;
mod users;

pub use collaborators::*;
pub use photos::*;
pub use pool::*;
pub use projects::*;
pub use unit_of_work::UnitOfWork;
pub use users::*;

use crate::Result;
use tracing::info;

/// Type alias for the SQLite connection pool.
pub type DbPool = sqlx::SqlitePool;

/// Initialize the database connection pool.
///
/// Creates parent directories if needed. An in-memory database gets a
/// single long-lived connection, since every SQLite connection to
/// `:memory:` would otherwise see its own empty database.
pub async fn init_pool(path: &str) -> Result<DbPool> {
    let config = if is_in_memory(path) {
        PoolConfig::test()
    } else {
        PoolConfig::default()
    };

    let pool = create_pool_with_config(path, config).await?;

    info!("Database pool initialized: {}", path);

    Ok(pool)
}

fn is_in_memory(path: &str) -> bool {
    path == ":memory:" || path == "sqlite::memory:"
}

/// Initialize the database schema.
///
/// Applies the complete schema from schema.sql. Uses IF NOT EXISTS
/// clauses so it's safe to run multiple times.
pub async fn initialize_schema(pool: &DbPool) -> Result<()> {
    let schema = include_str!("../../schema.sql");

    info!("Initializing database schema");

    // Split by semicolons and execute each statement
    for statement in schema.split(';') {
        // Strip comment lines, keeping only actual SQL
        let clean_stmt: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let clean_stmt = clean_stmt.trim();
        if clean_stmt.is_empty() {
            continue;
        }
        sqlx::query(clean_stmt).execute(pool).await?;
    }

    info!("Database schema initialized successfully");

    Ok(())
}

/// Open an in-memory database with the schema applied.
pub async fn init_memory_db() -> Result<DbPool> {
    let pool = init_pool(":memory:").await?;
    initialize_schema(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_pool_in_memory() {
        let pool = init_pool(":memory:").await.unwrap();
        assert!(pool.size() > 0);
        assert_eq!(pool.options().get_max_connections(), 1);
    }

    #[tokio::test]
    async fn test_schema_initialization() {
        let pool = init_memory_db().await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name"
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let table_names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();

        assert_eq!(
            table_names,
            vec!["photos", "project_collaborators", "projects", "users"]
        );
    }

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let pool = init_memory_db().await.unwrap();
        initialize_schema(&pool).await.unwrap();
    }
}
