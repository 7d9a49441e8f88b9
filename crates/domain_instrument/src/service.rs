//! Instrument service
//!
//! Application-level operations over trading records. Each public method
//! validates its scalar inputs, then runs exactly one transaction scope
//! around a single repository call, so every operation either commits as a
//! whole or leaves no trace.

use chrono::NaiveDate;
use tracing::{debug, instrument};

use core_kernel::{DateRange, InstrumentId, Page, PageRequest};

use crate::error::InstrumentError;
use crate::instrument::{Instrument, InstrumentFilter, InstrumentUpdate, NewInstrument, TradingDate};
use crate::ports::SessionFactory;
use crate::unit_of_work::UnitOfWork;
use crate::validation::{validate_instrument_update, validate_new_instrument, validate_num_dates};

/// Service over instrument trading records
#[derive(Debug, Clone)]
pub struct InstrumentService<F> {
    sessions: F,
}

impl<F: SessionFactory> InstrumentService<F> {
    /// Creates a service drawing sessions from `sessions`
    pub fn new(sessions: F) -> Self {
        Self { sessions }
    }

    /// The session factory backing this service
    pub fn sessions(&self) -> &F {
        &self.sessions
    }

    /// Lists the most recent trading days, newest first
    ///
    /// # Arguments
    ///
    /// * `num_dates` - How many distinct trading days to return at most
    ///
    /// # Errors
    ///
    /// Returns `InstrumentError::InvalidArgument` when `num_dates` is not positive
    #[instrument(skip(self), err)]
    pub async fn get_last_trading_days(&self, num_dates: i64) -> Result<Vec<TradingDate>, InstrumentError> {
        let count = validate_num_dates(num_dates)?;

        let mut uow = UnitOfWork::enter(&self.sessions).await?;
        let outcome = uow.instruments()?.recent_trading_dates(count).await.map_err(InstrumentError::from);
        let dates: Vec<NaiveDate> = uow.exit(outcome).await?;

        debug!(returned = dates.len(), "loaded trading days");
        Ok(dates.into_iter().map(TradingDate::from).collect())
    }

    /// Pages through records traded within `range` that match `filter`
    #[instrument(skip(self), err)]
    pub async fn get_dynamics(
        &self,
        filter: InstrumentFilter,
        range: DateRange,
        page: PageRequest,
    ) -> Result<Page<Instrument>, InstrumentError> {
        let mut uow = UnitOfWork::enter(&self.sessions).await?;
        let outcome = uow
            .instruments()?
            .dynamics(range, &filter, page)
            .await
            .map_err(InstrumentError::from);
        uow.exit(outcome).await
    }

    /// Pages through records matching `filter`, latest trading day first
    #[instrument(skip(self), err)]
    pub async fn get_trading_results(
        &self,
        filter: InstrumentFilter,
        page: PageRequest,
    ) -> Result<Page<Instrument>, InstrumentError> {
        let mut uow = UnitOfWork::enter(&self.sessions).await?;
        let outcome = uow
            .instruments()?
            .trading_results(&filter, page)
            .await
            .map_err(InstrumentError::from);
        uow.exit(outcome).await
    }

    // ========================================================================
    // Record Operations
    // ========================================================================

    /// Stores a validated record
    #[instrument(skip(self, new), err)]
    pub async fn add_one(&self, new: NewInstrument) -> Result<(), InstrumentError> {
        validate_new_instrument(&new)?;

        let mut uow = UnitOfWork::enter(&self.sessions).await?;
        let outcome = uow.instruments()?.insert(new).await.map_err(InstrumentError::from);
        uow.exit(outcome).await
    }

    /// Stores a validated record and returns its id
    #[instrument(skip(self, new), err)]
    pub async fn add_one_and_get_id(&self, new: NewInstrument) -> Result<InstrumentId, InstrumentError> {
        validate_new_instrument(&new)?;

        let mut uow = UnitOfWork::enter(&self.sessions).await?;
        let outcome = uow.instruments()?.insert_returning_id(new).await.map_err(InstrumentError::from);
        uow.exit(outcome).await
    }

    /// Stores a validated record and returns it as stored
    #[instrument(skip(self, new), err)]
    pub async fn add_one_and_get_obj(&self, new: NewInstrument) -> Result<Instrument, InstrumentError> {
        validate_new_instrument(&new)?;

        let mut uow = UnitOfWork::enter(&self.sessions).await?;
        let outcome = uow.instruments()?.insert_returning(new).await.map_err(InstrumentError::from);
        uow.exit(outcome).await
    }

    /// Finds the single record matching `filter`
    #[instrument(skip(self), err)]
    pub async fn get_one(&self, filter: InstrumentFilter) -> Result<Option<Instrument>, InstrumentError> {
        let mut uow = UnitOfWork::enter(&self.sessions).await?;
        let outcome = uow.instruments()?.find_one(&filter).await.map_err(InstrumentError::from);
        uow.exit(outcome).await
    }

    /// Finds every record matching `filter`
    #[instrument(skip(self), err)]
    pub async fn get_all(&self, filter: InstrumentFilter) -> Result<Vec<Instrument>, InstrumentError> {
        let mut uow = UnitOfWork::enter(&self.sessions).await?;
        let outcome = uow.instruments()?.find_all(&filter).await.map_err(InstrumentError::from);
        uow.exit(outcome).await
    }

    /// Applies a partial update to one record
    #[instrument(skip(self, update), err)]
    pub async fn update_one_by_id(
        &self,
        id: InstrumentId,
        update: InstrumentUpdate,
    ) -> Result<Option<Instrument>, InstrumentError> {
        validate_instrument_update(&update)?;

        let mut uow = UnitOfWork::enter(&self.sessions).await?;
        let outcome = uow.instruments()?.update_by_id(id, update).await.map_err(InstrumentError::from);
        uow.exit(outcome).await
    }

    /// Deletes every record matching `filter`
    #[instrument(skip(self), err)]
    pub async fn delete_by_filter(&self, filter: InstrumentFilter) -> Result<u64, InstrumentError> {
        let mut uow = UnitOfWork::enter(&self.sessions).await?;
        let outcome = uow.instruments()?.delete_by_filter(&filter).await.map_err(InstrumentError::from);
        uow.exit(outcome).await
    }

    /// Deletes every record
    #[instrument(skip(self), err)]
    pub async fn delete_all(&self) -> Result<u64, InstrumentError> {
        let mut uow = UnitOfWork::enter(&self.sessions).await?;
        let outcome = uow.instruments()?.delete_all().await.map_err(InstrumentError::from);
        uow.exit(outcome).await
    }

    /// Opens and closes an empty scope to prove the store is reachable
    pub async fn ping(&self) -> Result<(), InstrumentError> {
        let uow = UnitOfWork::enter(&self.sessions).await?;
        uow.exit(Ok::<(), InstrumentError>(())).await
    }
}
