//! Custom Test Assertions
//!
//! Assertion helpers for query results that give more meaningful failure
//! messages than a bare `assert!`.

use chrono::NaiveDate;
use core_kernel::{DateRange, Page};
use domain_instrument::{Instrument, InstrumentFilter, TradingDate};

/// Asserts that trading days are distinct and newest first
///
/// # Panics
///
/// Panics at the first pair that is not strictly descending
pub fn assert_strictly_descending(days: &[TradingDate]) {
    for pair in days.windows(2) {
        assert!(
            pair[0].date > pair[1].date,
            "Trading days not strictly descending: {} followed by {}",
            pair[0].date,
            pair[1].date
        );
    }
}

/// Asserts that every row on a page satisfies the filter and date range
pub fn assert_page_matches(page: &Page<Instrument>, filter: &InstrumentFilter, range: Option<DateRange>) {
    for row in &page.items {
        assert!(filter.matches(row), "Row {} does not match filter {:?}", row.id, filter);
        if let Some(range) = range {
            assert!(
                range.contains(row.date),
                "Row {} traded on {} outside {}..={}",
                row.id,
                row.date,
                range.start(),
                range.end()
            );
        }
    }
}

/// Asserts that rows are ordered by trading date ascending, then id
pub fn assert_ordered_by_date_asc(rows: &[Instrument]) {
    for pair in rows.windows(2) {
        assert!(
            (pair[0].date, pair[0].id) <= (pair[1].date, pair[1].id),
            "Rows out of order: {} on {} before {} on {}",
            pair[0].id,
            pair[0].date,
            pair[1].id,
            pair[1].date
        );
    }
}

/// Asserts that rows are ordered by trading date descending
pub fn assert_ordered_by_date_desc(rows: &[Instrument]) {
    let dates: Vec<NaiveDate> = rows.iter().map(|row| row.date).collect();
    for pair in dates.windows(2) {
        assert!(pair[0] >= pair[1], "Dates out of order: {} before {}", pair[0], pair[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::ymd;

    #[test]
    fn test_descending_days_pass() {
        assert_strictly_descending(&[
            TradingDate::from(ymd(2024, 2, 20)),
            TradingDate::from(ymd(2024, 2, 19)),
        ]);
    }

    #[test]
    #[should_panic(expected = "not strictly descending")]
    fn test_repeated_day_fails() {
        assert_strictly_descending(&[
            TradingDate::from(ymd(2024, 2, 20)),
            TradingDate::from(ymd(2024, 2, 20)),
        ]);
    }
}
