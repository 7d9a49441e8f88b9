//! Infrastructure Database Layer
//!
//! This crate backs the instrument domain ports with PostgreSQL using SQLx.
//!
//! # Architecture
//!
//! - **Pool**: `create_pool` builds a `PgPool` from `DatabaseConfig`, and
//!   `run_migrations` applies the embedded schema
//! - **Sessions**: `PgSessionFactory` opens one transaction per
//!   `PgSession`; the unit of work decides whether it commits
//! - **Repository**: `PgInstrumentRepository` runs every query on the
//!   transaction of the session that owns it
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_instrument::InstrumentService;
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PgSessionFactory};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/trading")).await?;
//! run_migrations(&pool).await?;
//! let service = InstrumentService::new(PgSessionFactory::new(pool));
//! ```

pub mod pool;
pub mod error;
pub mod session;
pub mod repositories;

pub use pool::{DatabasePool, DatabaseConfig, create_pool, run_migrations};
pub use error::DatabaseError;
pub use session::{PgSessionFactory, PgSession};
pub use repositories::PgInstrumentRepository;
