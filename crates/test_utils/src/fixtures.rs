//! Pre-built Test Fixtures
//!
//! Ready-to-use trading records. The data sets are small and predictable so
//! that tests can assert exact counts and orderings.

use chrono::NaiveDate;
use domain_instrument::NewInstrument;

use crate::builders::InstrumentBuilder;

/// Shorthand for a calendar date in fixtures
///
/// # Panics
///
/// Panics on an invalid date
pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// Fixture data sets for trading records
pub struct InstrumentFixtures;

impl InstrumentFixtures {
    /// One record per trading day from 2024-02-16 to 2024-02-20
    pub fn five_trading_days() -> Vec<NewInstrument> {
        (16..=20)
            .map(|day| InstrumentBuilder::new().on(ymd(2024, 2, day)).build())
            .collect()
    }

    /// Records around 2024-02-10..2024-02-11 with mixed delivery terms
    ///
    /// Exactly two rows have oil `A10K`, basis `ZLY` and delivery type `W`
    /// inside 2024-02-10..=2024-02-11; the rest differ in one attribute or
    /// fall outside the range.
    pub fn mixed_terms() -> Vec<NewInstrument> {
        let a10k_zly_w = || InstrumentBuilder::new().oil("A10K").basis("ZLY").delivery_type("W");
        vec![
            a10k_zly_w().on(ymd(2024, 2, 9)).build(),
            a10k_zly_w().on(ymd(2024, 2, 10)).build(),
            a10k_zly_w().on(ymd(2024, 2, 11)).build(),
            a10k_zly_w().on(ymd(2024, 2, 12)).build(),
            a10k_zly_w().delivery_type("F").on(ymd(2024, 2, 10)).build(),
            a10k_zly_w().basis("NVY").on(ymd(2024, 2, 11)).build(),
            a10k_zly_w().oil("A592").on(ymd(2024, 2, 10)).build(),
        ]
    }

    /// A single record traded on 2024-02-20
    pub fn single() -> NewInstrument {
        InstrumentBuilder::new().on(ymd(2024, 2, 20)).build()
    }
}
