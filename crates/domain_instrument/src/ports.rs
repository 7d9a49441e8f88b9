//! Instrument Domain Ports
//!
//! This module defines the storage interfaces the instrument domain depends
//! on. Three traits form the seam between the domain and a backend:
//!
//! - **`SessionFactory`**: hands out fresh sessions, one per transaction scope
//! - **`Session`**: one open transaction, committed or rolled back exactly once
//!   and then closed
//! - **`InstrumentRepository`**: typed queries bound to the session that owns it
//!
//! The PostgreSQL adapter lives in `infra_db`; an in-memory adapter for tests
//! is available behind the `mock` feature.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_instrument::{InstrumentFilter, SessionFactory, UnitOfWork};
//!
//! let mut uow = UnitOfWork::enter(&factory).await?;
//! let outcome = uow.instruments().find_all(&InstrumentFilter::all()).await;
//! let rows = uow.exit(outcome).await?;
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;

use core_kernel::{DateRange, InstrumentId, Page, PageRequest};

use crate::error::StoreError;
use crate::instrument::{Instrument, InstrumentFilter, InstrumentUpdate, NewInstrument};

/// Typed queries over the instrument table
///
/// Every call runs on the session that owns the repository. A repository
/// never commits or rolls back; that is the job of the enclosing
/// [`UnitOfWork`](crate::UnitOfWork).
#[async_trait]
pub trait InstrumentRepository: Send {
    /// Inserts a record without reading anything back
    async fn insert(&mut self, new: NewInstrument) -> Result<(), StoreError>;

    /// Inserts a record and returns the id the store assigned
    async fn insert_returning_id(&mut self, new: NewInstrument) -> Result<InstrumentId, StoreError>;

    /// Inserts a record and returns it as stored
    async fn insert_returning(&mut self, new: NewInstrument) -> Result<Instrument, StoreError>;

    /// Finds the single record matching the filter
    ///
    /// # Returns
    ///
    /// `None` when nothing matches, or `StoreError::AmbiguousResult` when the
    /// filter is not restrictive enough to select a single row
    async fn find_one(&mut self, filter: &InstrumentFilter) -> Result<Option<Instrument>, StoreError>;

    /// Finds every record matching the filter, ordered by id
    async fn find_all(&mut self, filter: &InstrumentFilter) -> Result<Vec<Instrument>, StoreError>;

    /// Applies a partial update and returns the record after the update
    ///
    /// Returns `None` when no record has the given id.
    async fn update_by_id(
        &mut self,
        id: InstrumentId,
        update: InstrumentUpdate,
    ) -> Result<Option<Instrument>, StoreError>;

    /// Deletes every record matching the filter and returns how many went
    async fn delete_by_filter(&mut self, filter: &InstrumentFilter) -> Result<u64, StoreError>;

    /// Deletes every record
    async fn delete_all(&mut self) -> Result<u64, StoreError>;

    /// Distinct trading dates, most recent first, at most `count` of them
    async fn recent_trading_dates(&mut self, count: u32) -> Result<Vec<NaiveDate>, StoreError>;

    /// Records traded within `range` (inclusive) that match the filter,
    /// ordered by date then id
    async fn dynamics(
        &mut self,
        range: DateRange,
        filter: &InstrumentFilter,
        page: PageRequest,
    ) -> Result<Page<Instrument>, StoreError>;

    /// Records matching the filter, most recent trading day first
    async fn trading_results(
        &mut self,
        filter: &InstrumentFilter,
        page: PageRequest,
    ) -> Result<Page<Instrument>, StoreError>;
}

/// One open database session
///
/// A session owns exactly one repository bound to its transaction. The
/// unit of work calls `commit` or `rollback` once and then `close`.
#[async_trait]
pub trait Session: Send + 'static {
    /// The repository bound to this session
    fn instruments(&mut self) -> &mut dyn InstrumentRepository;

    /// Makes every write in the session visible to other sessions
    async fn commit(&mut self) -> Result<(), StoreError>;

    /// Discards every write in the session
    async fn rollback(&mut self) -> Result<(), StoreError>;

    /// Releases the session back to the store
    async fn close(&mut self) -> Result<(), StoreError>;
}

/// Source of fresh sessions
#[async_trait]
pub trait SessionFactory: Send + Sync + 'static {
    type Session: Session;

    /// Opens a new session with its own transaction
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ResourceUnavailable` when the store cannot
    /// provide a session
    async fn new_session(&self) -> Result<Self::Session, StoreError>;
}

// ============================================================================
// Mock Implementation for Testing
// ============================================================================

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use chrono::Utc;

    #[derive(Debug, Clone, Default)]
    struct MockTable {
        rows: BTreeMap<InstrumentId, Instrument>,
        last_id: i64,
    }

    /// Counts of session lifecycle calls made against a mock factory
    #[derive(Debug, Default)]
    pub struct SessionJournal {
        opened: AtomicUsize,
        committed: AtomicUsize,
        rolled_back: AtomicUsize,
        closed: AtomicUsize,
    }

    impl SessionJournal {
        pub fn opened(&self) -> usize {
            self.opened.load(Ordering::SeqCst)
        }

        pub fn committed(&self) -> usize {
            self.committed.load(Ordering::SeqCst)
        }

        pub fn rolled_back(&self) -> usize {
            self.rolled_back.load(Ordering::SeqCst)
        }

        pub fn closed(&self) -> usize {
            self.closed.load(Ordering::SeqCst)
        }
    }

    #[derive(Debug, Default)]
    struct Faults {
        refuse_sessions: AtomicBool,
        fail_queries: AtomicBool,
        fail_commits: AtomicBool,
        fail_closes: AtomicBool,
    }

    /// In-memory session factory
    ///
    /// Each session works on a private copy of the table taken when it was
    /// opened; committing publishes that copy. Concurrent writers therefore
    /// see last-commit-wins semantics, which is enough for exercising the
    /// unit of work and the service layer.
    #[derive(Debug, Clone, Default)]
    pub struct MockSessionFactory {
        table: Arc<RwLock<MockTable>>,
        journal: Arc<SessionJournal>,
        faults: Arc<Faults>,
    }

    impl MockSessionFactory {
        /// Creates a factory over an empty table
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates the table, assigning ids in order starting at 1
        pub async fn with_instruments(records: Vec<NewInstrument>) -> Self {
            let factory = Self::new();
            {
                let mut table = factory.table.write().await;
                let now = Utc::now();
                for record in records {
                    table.last_id += 1;
                    let id = InstrumentId::new(table.last_id);
                    table.rows.insert(id, record.into_instrument(id, now));
                }
            }
            factory
        }

        /// Lifecycle counters for every session this factory opened
        pub fn journal(&self) -> &SessionJournal {
            &self.journal
        }

        /// Committed rows, ordered by id
        pub async fn committed_rows(&self) -> Vec<Instrument> {
            self.table.read().await.rows.values().cloned().collect()
        }

        /// Makes `new_session` fail as if the pool were exhausted
        pub fn refuse_sessions(&self, refuse: bool) {
            self.faults.refuse_sessions.store(refuse, Ordering::SeqCst);
        }

        /// Makes every repository call fail with a query error
        pub fn fail_queries(&self, fail: bool) {
            self.faults.fail_queries.store(fail, Ordering::SeqCst);
        }

        /// Makes `commit` fail without publishing
        pub fn fail_commits(&self, fail: bool) {
            self.faults.fail_commits.store(fail, Ordering::SeqCst);
        }

        /// Makes `close` report a failure after releasing the session
        pub fn fail_closes(&self, fail: bool) {
            self.faults.fail_closes.store(fail, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl SessionFactory for MockSessionFactory {
        type Session = MockSession;

        async fn new_session(&self) -> Result<MockSession, StoreError> {
            if self.faults.refuse_sessions.load(Ordering::SeqCst) {
                return Err(StoreError::unavailable("mock pool exhausted"));
            }
            let working = self.table.read().await.clone();
            self.journal.opened.fetch_add(1, Ordering::SeqCst);

            Ok(MockSession {
                table: Arc::clone(&self.table),
                journal: Arc::clone(&self.journal),
                faults: Arc::clone(&self.faults),
                repository: MockInstrumentRepository {
                    working,
                    active: true,
                    faults: Arc::clone(&self.faults),
                },
                closed: false,
            })
        }
    }

    /// A session over a private copy of the mock table
    #[derive(Debug)]
    pub struct MockSession {
        table: Arc<RwLock<MockTable>>,
        journal: Arc<SessionJournal>,
        faults: Arc<Faults>,
        repository: MockInstrumentRepository,
        closed: bool,
    }

    #[async_trait]
    impl Session for MockSession {
        fn instruments(&mut self) -> &mut dyn InstrumentRepository {
            &mut self.repository
        }

        async fn commit(&mut self) -> Result<(), StoreError> {
            if !self.repository.active {
                return Err(StoreError::SessionClosed);
            }
            self.repository.active = false;
            self.journal.committed.fetch_add(1, Ordering::SeqCst);
            if self.faults.fail_commits.load(Ordering::SeqCst) {
                return Err(StoreError::query("mock commit failed"));
            }
            *self.table.write().await = self.repository.working.clone();
            Ok(())
        }

        async fn rollback(&mut self) -> Result<(), StoreError> {
            if !self.repository.active {
                return Err(StoreError::SessionClosed);
            }
            self.repository.active = false;
            self.journal.rolled_back.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn close(&mut self) -> Result<(), StoreError> {
            if self.closed {
                return Err(StoreError::SessionClosed);
            }
            self.closed = true;
            self.repository.active = false;
            self.journal.closed.fetch_add(1, Ordering::SeqCst);
            if self.faults.fail_closes.load(Ordering::SeqCst) {
                return Err(StoreError::query("mock close failed"));
            }
            Ok(())
        }
    }

    /// Repository over a session's private copy of the table
    #[derive(Debug)]
    pub struct MockInstrumentRepository {
        working: MockTable,
        active: bool,
        faults: Arc<Faults>,
    }

    impl MockInstrumentRepository {
        fn check(&self) -> Result<(), StoreError> {
            if !self.active {
                return Err(StoreError::SessionClosed);
            }
            if self.faults.fail_queries.load(Ordering::SeqCst) {
                return Err(StoreError::query("mock query failed"));
            }
            Ok(())
        }

        fn matching<'a>(&'a self, filter: &'a InstrumentFilter) -> impl Iterator<Item = &'a Instrument> + 'a {
            self.working.rows.values().filter(move |row| filter.matches(row))
        }

        fn store(&mut self, new: NewInstrument) -> Instrument {
            self.working.last_id += 1;
            let id = InstrumentId::new(self.working.last_id);
            let row = new.into_instrument(id, Utc::now());
            self.working.rows.insert(id, row.clone());
            row
        }
    }

    #[async_trait]
    impl InstrumentRepository for MockInstrumentRepository {
        async fn insert(&mut self, new: NewInstrument) -> Result<(), StoreError> {
            self.check()?;
            self.store(new);
            Ok(())
        }

        async fn insert_returning_id(&mut self, new: NewInstrument) -> Result<InstrumentId, StoreError> {
            self.check()?;
            Ok(self.store(new).id)
        }

        async fn insert_returning(&mut self, new: NewInstrument) -> Result<Instrument, StoreError> {
            self.check()?;
            Ok(self.store(new))
        }

        async fn find_one(&mut self, filter: &InstrumentFilter) -> Result<Option<Instrument>, StoreError> {
            self.check()?;
            let found: Vec<_> = self.matching(filter).take(2).cloned().collect();
            match found.len() {
                0 | 1 => Ok(found.into_iter().next()),
                _ => Err(StoreError::AmbiguousResult {
                    matched: self.matching(filter).count() as u64,
                }),
            }
        }

        async fn find_all(&mut self, filter: &InstrumentFilter) -> Result<Vec<Instrument>, StoreError> {
            self.check()?;
            Ok(self.matching(filter).cloned().collect())
        }

        async fn update_by_id(
            &mut self,
            id: InstrumentId,
            update: InstrumentUpdate,
        ) -> Result<Option<Instrument>, StoreError> {
            self.check()?;
            Ok(self.working.rows.get_mut(&id).map(|row| {
                update.apply_to(row, Utc::now());
                row.clone()
            }))
        }

        async fn delete_by_filter(&mut self, filter: &InstrumentFilter) -> Result<u64, StoreError> {
            self.check()?;
            let before = self.working.rows.len();
            self.working.rows.retain(|_, row| !filter.matches(row));
            Ok((before - self.working.rows.len()) as u64)
        }

        async fn delete_all(&mut self) -> Result<u64, StoreError> {
            self.check()?;
            let removed = self.working.rows.len() as u64;
            self.working.rows.clear();
            Ok(removed)
        }

        async fn recent_trading_dates(&mut self, count: u32) -> Result<Vec<NaiveDate>, StoreError> {
            self.check()?;
            let dates: BTreeSet<NaiveDate> = self.working.rows.values().map(|row| row.date).collect();
            Ok(dates.into_iter().rev().take(count as usize).collect())
        }

        async fn dynamics(
            &mut self,
            range: DateRange,
            filter: &InstrumentFilter,
            page: PageRequest,
        ) -> Result<Page<Instrument>, StoreError> {
            self.check()?;
            let mut rows: Vec<_> = self
                .matching(filter)
                .filter(|row| range.contains(row.date))
                .cloned()
                .collect();
            rows.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
            Ok(Page::from_all(rows, page))
        }

        async fn trading_results(
            &mut self,
            filter: &InstrumentFilter,
            page: PageRequest,
        ) -> Result<Page<Instrument>, StoreError> {
            self.check()?;
            let mut rows: Vec<_> = self.matching(filter).cloned().collect();
            rows.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
            Ok(Page::from_all(rows, page))
        }
    }
}
