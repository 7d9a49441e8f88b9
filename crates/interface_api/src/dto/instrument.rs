//! Instrument DTOs
//!
//! Query-string shapes for the instrument endpoints. Length limits mirror
//! the exchange code formats; they are checked here, before any scope is
//! opened.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use core_kernel::{DateRange, PageRequest, DEFAULT_PAGE_SIZE};
use domain_instrument::InstrumentFilter;

use crate::error::ApiError;

/// Equality filter accepted by `GET /api/v1/instrument`
#[derive(Debug, Default, Deserialize, Validate)]
pub struct InstrumentListQuery {
    #[validate(length(min = 1, max = 11))]
    pub exchange_product_id: Option<String>,
    #[validate(length(min = 1, max = 300))]
    pub exchange_product_name: Option<String>,
    #[validate(length(min = 1, max = 4))]
    pub oil_id: Option<String>,
    #[validate(length(min = 1, max = 3))]
    pub delivery_basis_id: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub delivery_basis_name: Option<String>,
    #[validate(length(min = 1, max = 1))]
    pub delivery_type_id: Option<String>,
    pub date: Option<NaiveDate>,
}

impl InstrumentListQuery {
    pub fn into_filter(self) -> InstrumentFilter {
        InstrumentFilter {
            id: None,
            exchange_product_id: self.exchange_product_id,
            exchange_product_name: self.exchange_product_name,
            oil_id: self.oil_id,
            delivery_basis_id: self.delivery_basis_id,
            delivery_basis_name: self.delivery_basis_name,
            delivery_type_id: self.delivery_type_id,
            date: self.date,
        }
    }
}

/// Query for `GET /api/v1/instrument/last-trading-days`
///
/// Kept as text so that a non-integer is reported with the same message as
/// a non-positive count.
#[derive(Debug, Deserialize)]
pub struct LastTradingDaysQuery {
    pub num_dates: Option<String>,
}

/// Query for `GET /api/v1/instrument/dynamics`
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_date_order"))]
pub struct DynamicsQuery {
    #[validate(length(min = 1, max = 4))]
    pub oil_id: Option<String>,
    #[validate(length(min = 1, max = 1))]
    pub delivery_type_id: Option<String>,
    #[validate(length(min = 1, max = 3))]
    pub delivery_basis_id: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(range(min = 1))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100))]
    pub size: Option<u32>,
}

fn validate_date_order(query: &DynamicsQuery) -> Result<(), ValidationError> {
    if query.start_date > query.end_date {
        let mut error = ValidationError::new("date_order");
        error.message = Some("start_date must not be after end_date".into());
        return Err(error);
    }
    Ok(())
}

impl DynamicsQuery {
    pub fn filter(&self) -> InstrumentFilter {
        terms_filter(&self.oil_id, &self.delivery_type_id, &self.delivery_basis_id)
    }

    pub fn range(&self) -> Result<DateRange, ApiError> {
        DateRange::new(self.start_date, self.end_date).map_err(|e| ApiError::validation(e.to_string()))
    }

    pub fn page_request(&self) -> Result<PageRequest, ApiError> {
        page_request(self.page, self.size)
    }
}

/// Query for `GET /api/v1/instrument/trading-results`
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TradingResultsQuery {
    #[validate(length(min = 1, max = 4))]
    pub oil_id: Option<String>,
    #[validate(length(min = 1, max = 1))]
    pub delivery_type_id: Option<String>,
    #[validate(length(min = 1, max = 3))]
    pub delivery_basis_id: Option<String>,
    #[validate(range(min = 1))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100))]
    pub size: Option<u32>,
}

impl TradingResultsQuery {
    pub fn filter(&self) -> InstrumentFilter {
        terms_filter(&self.oil_id, &self.delivery_type_id, &self.delivery_basis_id)
    }

    pub fn page_request(&self) -> Result<PageRequest, ApiError> {
        page_request(self.page, self.size)
    }
}

fn terms_filter(
    oil_id: &Option<String>,
    delivery_type_id: &Option<String>,
    delivery_basis_id: &Option<String>,
) -> InstrumentFilter {
    InstrumentFilter {
        oil_id: oil_id.clone(),
        delivery_type_id: delivery_type_id.clone(),
        delivery_basis_id: delivery_basis_id.clone(),
        ..Default::default()
    }
}

fn page_request(page: Option<u32>, size: Option<u32>) -> Result<PageRequest, ApiError> {
    PageRequest::new(page.unwrap_or(1), size.unwrap_or(DEFAULT_PAGE_SIZE))
        .map_err(|e| ApiError::validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dynamics(start: NaiveDate, end: NaiveDate) -> DynamicsQuery {
        DynamicsQuery {
            oil_id: Some("A10K".to_string()),
            delivery_type_id: Some("W".to_string()),
            delivery_basis_id: Some("ZLY".to_string()),
            start_date: start,
            end_date: end,
            page: None,
            size: None,
        }
    }

    #[test]
    fn test_valid_dynamics_query() {
        let query = dynamics(date(2024, 2, 10), date(2024, 2, 11));
        assert!(query.validate().is_ok());
        assert_eq!(query.filter().oil_id.as_deref(), Some("A10K"));
        assert_eq!(query.page_request().unwrap(), PageRequest::default());
    }

    #[test]
    fn test_start_after_end_fails_validation() {
        let query = dynamics(date(2024, 2, 11), date(2024, 2, 10));
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_overlong_terms_fail_validation() {
        let mut query = dynamics(date(2024, 2, 10), date(2024, 2, 11));
        query.delivery_type_id = Some("WW".to_string());
        query.oil_id = Some("A10KX".to_string());

        let errors = query.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("oil_id"));
        assert!(fields.contains_key("delivery_type_id"));
    }

    #[test]
    fn test_oversized_page_fails_validation() {
        let query = TradingResultsQuery {
            size: Some(500),
            ..Default::default()
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_list_query_maps_every_field() {
        let query = InstrumentListQuery {
            oil_id: Some("A592".to_string()),
            date: Some(date(2024, 2, 10)),
            ..Default::default()
        };

        let filter = query.into_filter();

        assert_eq!(filter.oil_id.as_deref(), Some("A592"));
        assert_eq!(filter.date, Some(date(2024, 2, 10)));
        assert!(filter.exchange_product_id.is_none());
    }
}
