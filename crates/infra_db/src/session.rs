//! PostgreSQL sessions
//!
//! A [`PgSession`] is one pooled connection inside one open transaction.
//! The session factory begins the transaction eagerly, so a pool that cannot
//! hand out a connection surfaces as `StoreError::ResourceUnavailable` at
//! scope entry rather than on the first query.

use async_trait::async_trait;
use tracing::{debug, instrument};

use domain_instrument::{InstrumentRepository, Session, SessionFactory, StoreError};

use crate::error::DatabaseError;
use crate::pool::DatabasePool;
use crate::repositories::PgInstrumentRepository;

/// Opens PostgreSQL sessions from a shared pool
#[derive(Debug, Clone)]
pub struct PgSessionFactory {
    pool: DatabasePool,
}

impl PgSessionFactory {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }
}

#[async_trait]
impl SessionFactory for PgSessionFactory {
    type Session = PgSession;

    #[instrument(skip(self))]
    async fn new_session(&self) -> Result<PgSession, StoreError> {
        let tx = self.pool.begin().await.map_err(DatabaseError::from)?;
        debug!("transaction opened");
        Ok(PgSession {
            repository: PgInstrumentRepository::new(tx),
            closed: false,
        })
    }
}

/// One open transaction and the repository bound to it
#[derive(Debug)]
pub struct PgSession {
    repository: PgInstrumentRepository,
    closed: bool,
}

#[async_trait]
impl Session for PgSession {
    fn instruments(&mut self) -> &mut dyn InstrumentRepository {
        &mut self.repository
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        let tx = self.repository.take_transaction().ok_or(StoreError::SessionClosed)?;
        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;
        debug!("transaction committed");
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        let tx = self.repository.take_transaction().ok_or(StoreError::SessionClosed)?;
        tx.rollback()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;
        debug!("transaction rolled back");
        Ok(())
    }

    /// Returns the connection to the pool
    ///
    /// A transaction still open at this point is dropped, which makes SQLx
    /// roll it back before the connection is reused.
    async fn close(&mut self) -> Result<(), StoreError> {
        if self.closed {
            return Err(StoreError::SessionClosed);
        }
        self.closed = true;
        if self.repository.take_transaction().is_some() {
            debug!("open transaction discarded on close");
        }
        Ok(())
    }
}
