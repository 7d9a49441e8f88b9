//! Strongly-typed identifiers for stored records
//!
//! Rows carry database-assigned integer keys. Wrapping them in newtypes keeps
//! an instrument id from being confused with a count, an offset or a page
//! number somewhere along the call chain.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a key assigned by the store
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw key
            pub fn value(&self) -> i64 {
                self.0
            }

            /// Returns the identifier prefix for display
            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                // Strip prefix if present
                let raw = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Ok(Self(raw.parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }
    };
}

define_id!(InstrumentId, "INS");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instrument_id_display() {
        let id = InstrumentId::new(42);
        assert_eq!(id.to_string(), "INS-42");
    }

    #[test]
    fn test_id_parsing_with_and_without_prefix() {
        let prefixed: InstrumentId = "INS-7".parse().unwrap();
        let bare: InstrumentId = "7".parse().unwrap();
        assert_eq!(prefixed, bare);
        assert_eq!(bare.value(), 7);
    }

    #[test]
    fn test_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&InstrumentId::new(15)).unwrap();
        assert_eq!(json, "15");
    }
}
