//! Shared fixtures for domain_instrument integration tests

#![allow(dead_code)]

use chrono::NaiveDate;

use domain_instrument::{MockSessionFactory, NewInstrument};
use test_utils::{InstrumentBuilder, InstrumentFixtures};

pub use test_utils::ymd as date;

pub fn record(oil_id: &str, delivery_basis_id: &str, delivery_type_id: &str, on: NaiveDate) -> NewInstrument {
    InstrumentBuilder::new()
        .oil(oil_id)
        .basis(delivery_basis_id)
        .delivery_type(delivery_type_id)
        .on(on)
        .build()
}

pub fn five_trading_days() -> Vec<NewInstrument> {
    InstrumentFixtures::five_trading_days()
}

pub fn mixed_terms() -> Vec<NewInstrument> {
    InstrumentFixtures::mixed_terms()
}

pub async fn seeded(records: Vec<NewInstrument>) -> MockSessionFactory {
    MockSessionFactory::with_instruments(records).await
}
