//! Repository implementations for domain ports
//!
//! Repositories encapsulate SQL and map between database rows and domain
//! types. They never own a connection pool: each one borrows the
//! transaction of the session that created it.

pub mod instrument;

pub use instrument::{PgInstrumentRepository, InstrumentRow};
