//! Property-Based Test Generators
//!
//! Proptest strategies that produce records satisfying the write-side
//! validation rules, drawn from a small vocabulary so that filters and
//! date queries actually hit.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_instrument::NewInstrument;

use crate::builders::InstrumentBuilder;

/// Strategy for oil ids used in generated data
pub fn oil_id_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["A100", "A10K", "A592", "DT"])
}

/// Strategy for delivery basis ids used in generated data
pub fn basis_id_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["NVY", "ZLY", "KRS"])
}

/// Strategy for delivery type ids used in generated data
pub fn delivery_type_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["F", "W"])
}

/// Strategy for trading days in February 2024
pub fn trading_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (1u32..=29).prop_map(|day| NaiveDate::from_ymd_opt(2024, 2, day).unwrap_or_default())
}

/// Strategy for non-negative traded quantities with two decimal places
pub fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|minor| Decimal::new(minor, 2))
}

/// Strategy for valid trading records
pub fn new_instrument_strategy() -> impl Strategy<Value = NewInstrument> {
    (
        oil_id_strategy(),
        basis_id_strategy(),
        delivery_type_strategy(),
        trading_date_strategy(),
        quantity_strategy(),
        quantity_strategy(),
        1i64..500,
    )
        .prop_map(|(oil, basis, kind, date, volume, total, count)| {
            InstrumentBuilder::new()
                .oil(oil)
                .basis(basis)
                .delivery_type(kind)
                .traded(volume, total, Decimal::from(count))
                .on(date)
                .build()
        })
}
