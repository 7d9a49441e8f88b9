//! Instrument Trading Records Domain
//!
//! This crate holds everything the trading results API knows about
//! exchange instruments, independent of any storage backend:
//!
//! - **Model**: `Instrument` records, `NewInstrument` inserts,
//!   `InstrumentUpdate` patches and `InstrumentFilter` equality filters
//! - **Ports**: `InstrumentRepository`, `Session` and `SessionFactory`
//! - **Unit of work**: `UnitOfWork`, one transaction scope per operation
//! - **Service**: `InstrumentService`, validation plus one scope per call
//!
//! # Examples
//!
//! ```rust,ignore
//! use domain_instrument::InstrumentService;
//! use infra_db::PgSessionFactory;
//!
//! let service = InstrumentService::new(PgSessionFactory::new(pool));
//! let days = service.get_last_trading_days(5).await?;
//! ```

pub mod instrument;
pub mod error;
pub mod validation;
pub mod ports;
pub mod unit_of_work;
pub mod service;

pub use instrument::{
    Instrument, NewInstrument, InstrumentUpdate, InstrumentFilter, TradingDate,
};
pub use error::{InstrumentError, StoreError};
pub use validation::{
    parse_num_dates, validate_instrument_update, validate_new_instrument, validate_num_dates, NUM_DATES_MESSAGE,
};
pub use ports::{InstrumentRepository, Session, SessionFactory};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{MockSessionFactory, MockSession, SessionJournal};
pub use unit_of_work::{UnitOfWork, ScopeState};
pub use service::InstrumentService;
