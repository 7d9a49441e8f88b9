//! Instrument validation rules
//!
//! Scalar checks applied before a request reaches a repository.
//!
//! # Validation Rules
//!
//! ## Trading day counts
//! - Must parse as an integer
//! - Must be strictly positive
//!
//! ## New records
//! - Identifier attributes must be non-empty and within their length limits
//! - Volume, total and count must be non-negative
//!
//! ## Updates
//! - Every field that is set follows the new-record rule for that field

use rust_decimal::Decimal;

use crate::error::InstrumentError;
use crate::instrument::{
    InstrumentUpdate, NewInstrument, MAX_DELIVERY_BASIS_ID_LEN, MAX_DELIVERY_BASIS_NAME_LEN,
    MAX_DELIVERY_TYPE_ID_LEN, MAX_EXCHANGE_PRODUCT_ID_LEN, MAX_EXCHANGE_PRODUCT_NAME_LEN,
    MAX_OIL_ID_LEN,
};

/// Message returned for any invalid trading day count
pub const NUM_DATES_MESSAGE: &str = "Number of dates must be a positive integer";

/// Checks a requested number of trading days
///
/// # Errors
///
/// Returns `InstrumentError::InvalidArgument` when `num_dates` is zero or negative
pub fn validate_num_dates(num_dates: i64) -> Result<u32, InstrumentError> {
    if num_dates <= 0 {
        return Err(InstrumentError::invalid_argument(NUM_DATES_MESSAGE));
    }
    // Counts beyond u32 cannot exceed the number of distinct dates anyway
    Ok(u32::try_from(num_dates).unwrap_or(u32::MAX))
}

/// Parses and checks a trading day count supplied as text
///
/// # Errors
///
/// Returns `InstrumentError::InvalidArgument` when `raw` is not an integer
/// or is not positive
pub fn parse_num_dates(raw: &str) -> Result<u32, InstrumentError> {
    let parsed = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| InstrumentError::invalid_argument(NUM_DATES_MESSAGE))?;
    validate_num_dates(parsed)
}

/// Checks a record before it is written
///
/// # Errors
///
/// Returns `InstrumentError::InvalidArgument` naming the first offending field
pub fn validate_new_instrument(new: &NewInstrument) -> Result<(), InstrumentError> {
    check_text("exchange_product_id", &new.exchange_product_id, MAX_EXCHANGE_PRODUCT_ID_LEN)?;
    check_text("exchange_product_name", &new.exchange_product_name, MAX_EXCHANGE_PRODUCT_NAME_LEN)?;
    check_text("oil_id", &new.oil_id, MAX_OIL_ID_LEN)?;
    check_text("delivery_basis_id", &new.delivery_basis_id, MAX_DELIVERY_BASIS_ID_LEN)?;
    check_text("delivery_basis_name", &new.delivery_basis_name, MAX_DELIVERY_BASIS_NAME_LEN)?;
    check_text("delivery_type_id", &new.delivery_type_id, MAX_DELIVERY_TYPE_ID_LEN)?;
    check_non_negative("volume", new.volume)?;
    check_non_negative("total", new.total)?;
    check_non_negative("count", new.count)?;
    Ok(())
}

/// Checks the fields an update would change
///
/// # Errors
///
/// Returns `InstrumentError::InvalidArgument` naming the first offending field
pub fn validate_instrument_update(update: &InstrumentUpdate) -> Result<(), InstrumentError> {
    let texts = [
        ("exchange_product_id", &update.exchange_product_id, MAX_EXCHANGE_PRODUCT_ID_LEN),
        ("exchange_product_name", &update.exchange_product_name, MAX_EXCHANGE_PRODUCT_NAME_LEN),
        ("oil_id", &update.oil_id, MAX_OIL_ID_LEN),
        ("delivery_basis_id", &update.delivery_basis_id, MAX_DELIVERY_BASIS_ID_LEN),
        ("delivery_basis_name", &update.delivery_basis_name, MAX_DELIVERY_BASIS_NAME_LEN),
        ("delivery_type_id", &update.delivery_type_id, MAX_DELIVERY_TYPE_ID_LEN),
    ];
    for (field, value, max_len) in texts {
        if let Some(value) = value {
            check_text(field, value, max_len)?;
        }
    }

    for (field, value) in [("volume", update.volume), ("total", update.total), ("count", update.count)] {
        if let Some(value) = value {
            check_non_negative(field, value)?;
        }
    }
    Ok(())
}

fn check_text(field: &str, value: &str, max_len: usize) -> Result<(), InstrumentError> {
    if value.is_empty() {
        return Err(InstrumentError::invalid_argument(format!("{} must not be empty", field)));
    }
    if value.chars().count() > max_len {
        return Err(InstrumentError::invalid_argument(format!(
            "{} must be at most {} characters",
            field, max_len
        )));
    }
    Ok(())
}

fn check_non_negative(field: &str, value: Decimal) -> Result<(), InstrumentError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(InstrumentError::invalid_argument(format!("{} must not be negative", field)));
    }
    Ok(())
}
