//! Instrument trading records
//!
//! One record describes how a single exchange product traded on one day:
//! which oil product and delivery terms it covers, and the volume, money
//! total and number of contracts traded.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::InstrumentId;

/// Longest exchange product id accepted at the validation boundary
pub const MAX_EXCHANGE_PRODUCT_ID_LEN: usize = 11;
/// Longest oil id accepted at the validation boundary
pub const MAX_OIL_ID_LEN: usize = 4;
/// Longest delivery basis id accepted at the validation boundary
pub const MAX_DELIVERY_BASIS_ID_LEN: usize = 3;
/// Longest delivery type id accepted at the validation boundary
pub const MAX_DELIVERY_TYPE_ID_LEN: usize = 1;
/// Column width of `exchange_product_name`
pub const MAX_EXCHANGE_PRODUCT_NAME_LEN: usize = 300;
/// Column width of `delivery_basis_name`
pub const MAX_DELIVERY_BASIS_NAME_LEN: usize = 50;

/// A stored trading record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub id: InstrumentId,
    pub exchange_product_id: String,
    pub exchange_product_name: String,
    pub oil_id: String,
    pub delivery_basis_id: String,
    pub delivery_basis_name: String,
    pub delivery_type_id: String,
    pub volume: Decimal,
    pub total: Decimal,
    pub count: Decimal,
    /// Trading day
    pub date: NaiveDate,
    pub created_on: DateTime<Utc>,
    pub updated_on: Option<DateTime<Utc>>,
}

/// Field values for a record that has not been stored yet
///
/// The id and audit timestamps are assigned by the writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInstrument {
    pub exchange_product_id: String,
    pub exchange_product_name: String,
    pub oil_id: String,
    pub delivery_basis_id: String,
    pub delivery_basis_name: String,
    pub delivery_type_id: String,
    pub volume: Decimal,
    pub total: Decimal,
    pub count: Decimal,
    pub date: NaiveDate,
}

impl NewInstrument {
    /// Materializes the record as the store would after an insert
    pub fn into_instrument(self, id: InstrumentId, created_on: DateTime<Utc>) -> Instrument {
        Instrument {
            id,
            exchange_product_id: self.exchange_product_id,
            exchange_product_name: self.exchange_product_name,
            oil_id: self.oil_id,
            delivery_basis_id: self.delivery_basis_id,
            delivery_basis_name: self.delivery_basis_name,
            delivery_type_id: self.delivery_type_id,
            volume: self.volume,
            total: self.total,
            count: self.count,
            date: self.date,
            created_on,
            updated_on: None,
        }
    }
}

/// Partial update of a stored record; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentUpdate {
    pub exchange_product_id: Option<String>,
    pub exchange_product_name: Option<String>,
    pub oil_id: Option<String>,
    pub delivery_basis_id: Option<String>,
    pub delivery_basis_name: Option<String>,
    pub delivery_type_id: Option<String>,
    pub volume: Option<Decimal>,
    pub total: Option<Decimal>,
    pub count: Option<Decimal>,
    pub date: Option<NaiveDate>,
}

impl InstrumentUpdate {
    /// Returns true if the update would not change any field
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the update in place and stamps `updated_on`
    pub fn apply_to(&self, instrument: &mut Instrument, now: DateTime<Utc>) {
        if let Some(ref v) = self.exchange_product_id {
            instrument.exchange_product_id = v.clone();
        }
        if let Some(ref v) = self.exchange_product_name {
            instrument.exchange_product_name = v.clone();
        }
        if let Some(ref v) = self.oil_id {
            instrument.oil_id = v.clone();
        }
        if let Some(ref v) = self.delivery_basis_id {
            instrument.delivery_basis_id = v.clone();
        }
        if let Some(ref v) = self.delivery_basis_name {
            instrument.delivery_basis_name = v.clone();
        }
        if let Some(ref v) = self.delivery_type_id {
            instrument.delivery_type_id = v.clone();
        }
        if let Some(v) = self.volume {
            instrument.volume = v;
        }
        if let Some(v) = self.total {
            instrument.total = v;
        }
        if let Some(v) = self.count {
            instrument.count = v;
        }
        if let Some(v) = self.date {
            instrument.date = v;
        }
        instrument.updated_on = Some(now);
    }
}

/// Equality filter over record attributes
///
/// Every field that is set must match exactly; unset fields are wildcards
/// and never exclude a row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentFilter {
    pub id: Option<InstrumentId>,
    pub exchange_product_id: Option<String>,
    pub exchange_product_name: Option<String>,
    pub oil_id: Option<String>,
    pub delivery_basis_id: Option<String>,
    pub delivery_basis_name: Option<String>,
    pub delivery_type_id: Option<String>,
    pub date: Option<NaiveDate>,
}

impl InstrumentFilter {
    /// A filter that matches every row
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches a single record by id
    pub fn by_id(id: InstrumentId) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    pub fn exchange_product_id(mut self, value: impl Into<String>) -> Self {
        self.exchange_product_id = Some(value.into());
        self
    }

    pub fn oil_id(mut self, value: impl Into<String>) -> Self {
        self.oil_id = Some(value.into());
        self
    }

    pub fn delivery_basis_id(mut self, value: impl Into<String>) -> Self {
        self.delivery_basis_id = Some(value.into());
        self
    }

    pub fn delivery_type_id(mut self, value: impl Into<String>) -> Self {
        self.delivery_type_id = Some(value.into());
        self
    }

    pub fn date(mut self, value: NaiveDate) -> Self {
        self.date = Some(value);
        self
    }

    /// Returns true if no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Evaluates the predicate against a record
    pub fn matches(&self, instrument: &Instrument) -> bool {
        fn field_matches<T: PartialEq>(expected: &Option<T>, actual: &T) -> bool {
            expected.as_ref().map_or(true, |e| e == actual)
        }

        field_matches(&self.id, &instrument.id)
            && field_matches(&self.exchange_product_id, &instrument.exchange_product_id)
            && field_matches(&self.exchange_product_name, &instrument.exchange_product_name)
            && field_matches(&self.oil_id, &instrument.oil_id)
            && field_matches(&self.delivery_basis_id, &instrument.delivery_basis_id)
            && field_matches(&self.delivery_basis_name, &instrument.delivery_basis_name)
            && field_matches(&self.delivery_type_id, &instrument.delivery_type_id)
            && field_matches(&self.date, &instrument.date)
    }
}

/// A trading day present in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TradingDate {
    pub date: NaiveDate,
}

impl From<NaiveDate> for TradingDate {
    fn from(date: NaiveDate) -> Self {
        Self { date }
    }
}
