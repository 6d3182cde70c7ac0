//! Transactional unit of work.
//!
//! Every write made through a [`UnitOfWork`] becomes visible to other
//! connections only once [`UnitOfWork::commit`] succeeds. A unit of work
//! that is dropped without being committed is rolled back, so an early
//! return or `?` on any failure path can never leave partial writes behind.

use sqlx::{Sqlite, SqliteConnection, Transaction};
use tracing::{debug, warn};

use super::DbPool;
use crate::Result;

/// A single open transaction against the project store.
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl UnitOfWork {
    /// Start a transaction.
    ///
    /// Any statement executed on [`conn`](Self::conn) after this point, and
    /// before `commit()`, will be rolled back in the event of an error.
    pub async fn begin(pool: &DbPool) -> Result<Self> {
        let tx = pool.begin().await?;
        debug!("Unit of work started");
        Ok(Self { tx })
    }

    /// The connection all statements of this unit of work must run on.
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.tx
    }

    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        debug!("Unit of work committed");
        Ok(())
    }

    /// Roll back explicitly. Failures are logged and swallowed: the
    /// transaction is abandoned either way once the connection is released.
    pub async fn rollback(self) {
        if let Err(e) = self.tx.rollback().await {
            warn!(error = %e, "Rollback failed, transaction abandoned");
        } else {
            debug!("Unit of work rolled back");
        }
    }
}
