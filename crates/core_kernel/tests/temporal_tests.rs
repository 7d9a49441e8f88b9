//! Unit tests for the Temporal module
//!
//! Tests cover DateRange construction, containment and day iteration.

use chrono::NaiveDate;
use core_kernel::temporal::{DateRange, TemporalError};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

mod date_range {
    use super::*;

    mod creation {
        use super::*;

        #[test]
        fn test_new_accepts_ordered_dates() {
            let range = DateRange::new(date(2024, 2, 10), date(2024, 2, 11)).unwrap();

            assert_eq!(range.start(), date(2024, 2, 10));
            assert_eq!(range.end(), date(2024, 2, 11));
        }

        #[test]
        fn test_new_accepts_equal_dates() {
            let range = DateRange::new(date(2024, 2, 11), date(2024, 2, 11)).unwrap();

            assert_eq!(range, DateRange::single_day(date(2024, 2, 11)));
            assert_eq!(range.days(), 1);
        }

        #[test]
        fn test_new_fails_when_start_after_end() {
            let result = DateRange::new(date(2024, 2, 12), date(2024, 2, 11));

            assert_eq!(
                result,
                Err(TemporalError::InvalidPeriod {
                    start: "2024-02-12".to_string(),
                    end: "2024-02-11".to_string(),
                })
            );
        }
    }

    mod containment {
        use super::*;

        #[test]
        fn test_contains_both_bounds() {
            let range = DateRange::new(date(2024, 2, 16), date(2024, 2, 20)).unwrap();

            assert!(range.contains(date(2024, 2, 16)));
            assert!(range.contains(date(2024, 2, 18)));
            assert!(range.contains(date(2024, 2, 20)));
        }

        #[test]
        fn test_excludes_dates_outside() {
            let range = DateRange::new(date(2024, 2, 16), date(2024, 2, 20)).unwrap();

            assert!(!range.contains(date(2024, 2, 15)));
            assert!(!range.contains(date(2024, 2, 21)));
        }
    }

    #[test]
    fn test_iter_days_matches_day_count() {
        let range = DateRange::new(date(2024, 2, 16), date(2024, 2, 20)).unwrap();
        let days: Vec<_> = range.iter_days().collect();

        assert_eq!(days.len() as i64, range.days());
        assert_eq!(days.first(), Some(&date(2024, 2, 16)));
        assert_eq!(days.last(), Some(&date(2024, 2, 20)));
    }

    #[test]
    fn test_serde_uses_iso_dates() {
        let range = DateRange::new(date(2024, 2, 10), date(2024, 2, 11)).unwrap();
        let json = serde_json::to_value(range).unwrap();

        assert_eq!(json["start"], "2024-02-10");
        assert_eq!(json["end"], "2024-02-11");
    }
}
