//! Application state for Showcase.
//!
//! Contains the shared state that is passed to all handlers.

use crate::config::ProjectRulesConfig;
use crate::db::DbPool;
use crate::services::ProjectService;
use crate::{config, Result};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DbPool,
    /// Project lifecycle service.
    pub projects: ProjectService,
}

impl AppState {
    /// Create application state from the global configuration, opening the
    /// database and applying the schema.
    pub async fn new() -> Result<Self> {
        let config = config::config();

        let db = crate::db::init_pool(&config.database.path).await?;
        crate::db::initialize_schema(&db).await?;

        Ok(Self::with_pool(db, config.rules.clone()))
    }

    /// Build state around an existing pool.
    pub fn with_pool(db: DbPool, rules: ProjectRulesConfig) -> Self {
        let projects = ProjectService::new(db.clone(), rules);
        Self { db, projects }
    }
}
