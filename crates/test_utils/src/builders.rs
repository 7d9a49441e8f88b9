//! Test Data Builders
//!
//! Builder for trading records with sensible defaults, so tests only spell
//! out the attributes they care about.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_instrument::NewInstrument;

/// Builder for constructing test trading records
///
/// The exchange product id is derived from oil, basis and delivery type
/// unless set explicitly, mirroring how exchange codes are composed.
#[derive(Debug, Clone)]
pub struct InstrumentBuilder {
    exchange_product_id: Option<String>,
    exchange_product_name: String,
    oil_id: String,
    delivery_basis_id: String,
    delivery_basis_name: String,
    delivery_type_id: String,
    volume: Decimal,
    total: Decimal,
    count: Decimal,
    date: NaiveDate,
}

impl Default for InstrumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InstrumentBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            exchange_product_id: None,
            exchange_product_name: "Gasoline AI-100".to_string(),
            oil_id: "A100".to_string(),
            delivery_basis_id: "NVY".to_string(),
            delivery_basis_name: "Novoyaroslavskaya".to_string(),
            delivery_type_id: "F".to_string(),
            volume: dec!(60),
            total: dec!(4200000),
            count: dec!(1),
            date: NaiveDate::from_ymd_opt(2024, 2, 20).unwrap_or_default(),
        }
    }

    pub fn product_id(mut self, id: impl Into<String>) -> Self {
        self.exchange_product_id = Some(id.into());
        self
    }

    pub fn product_name(mut self, name: impl Into<String>) -> Self {
        self.exchange_product_name = name.into();
        self
    }

    pub fn oil(mut self, oil_id: impl Into<String>) -> Self {
        self.oil_id = oil_id.into();
        self
    }

    pub fn basis(mut self, basis_id: impl Into<String>) -> Self {
        self.delivery_basis_id = basis_id.into();
        self
    }

    pub fn basis_name(mut self, name: impl Into<String>) -> Self {
        self.delivery_basis_name = name.into();
        self
    }

    pub fn delivery_type(mut self, type_id: impl Into<String>) -> Self {
        self.delivery_type_id = type_id.into();
        self
    }

    /// Sets volume, total and contract count together
    pub fn traded(mut self, volume: Decimal, total: Decimal, count: Decimal) -> Self {
        self.volume = volume;
        self.total = total;
        self.count = count;
        self
    }

    /// Sets the trading day
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Builds the record
    pub fn build(self) -> NewInstrument {
        let exchange_product_id = self.exchange_product_id.unwrap_or_else(|| {
            format!("{}{}060{}", self.oil_id, self.delivery_basis_id, self.delivery_type_id)
        });
        NewInstrument {
            exchange_product_id,
            exchange_product_name: self.exchange_product_name,
            oil_id: self.oil_id,
            delivery_basis_id: self.delivery_basis_id,
            delivery_basis_name: self.delivery_basis_name,
            delivery_type_id: self.delivery_type_id,
            volume: self.volume,
            total: self.total,
            count: self.count,
            date: self.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_instrument::validate_new_instrument;

    #[test]
    fn test_default_record_is_valid() {
        let record = InstrumentBuilder::new().build();
        assert_eq!(record.exchange_product_id, "A100NVY060F");
        assert!(validate_new_instrument(&record).is_ok());
    }

    #[test]
    fn test_explicit_product_id_wins() {
        let record = InstrumentBuilder::new().oil("A10K").product_id("CUSTOM").build();
        assert_eq!(record.exchange_product_id, "CUSTOM");
        assert_eq!(record.oil_id, "A10K");
    }
}
