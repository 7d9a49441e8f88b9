//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! trading results test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built trading day data sets
//! - `builders`: Builder for instrument records
//! - `database`: PostgreSQL testcontainer management
//! - `assertions`: Assertion helpers for query results
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
