//! Core Kernel - Foundational types shared by the trading results crates
//!
//! This crate provides the fundamental building blocks used across all layers:
//! - Strongly-typed surrogate identifiers
//! - Inclusive calendar date ranges
//! - Page requests and paged result sets

pub mod temporal;
pub mod identifiers;
pub mod pagination;
pub mod error;

pub use temporal::{DateRange, TemporalError};
pub use identifiers::InstrumentId;
pub use pagination::{Page, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use error::CoreError;
