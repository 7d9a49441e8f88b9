//! Instrument handlers

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use validator::Validate;

use core_kernel::{InstrumentId, Page};
use domain_instrument::{parse_num_dates, Instrument, InstrumentFilter, SessionFactory, TradingDate};

use crate::dto::instrument::*;
use crate::{error::ApiError, AppState};

/// Lists records matching an equality filter
pub async fn list_instruments<F: SessionFactory>(
    State(state): State<AppState<F>>,
    query: Result<Query<InstrumentListQuery>, QueryRejection>,
) -> Result<Json<Vec<Instrument>>, ApiError> {
    let Query(query) = query?;
    query.validate()?;

    let rows = state.service.get_all(query.into_filter()).await?;
    Ok(Json(rows))
}

/// Gets a record by id; accepts `42` or `INS-42`
pub async fn get_instrument<F: SessionFactory>(
    State(state): State<AppState<F>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Instrument>, ApiError> {
    let id: InstrumentId = raw_id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid instrument id '{}'", raw_id)))?;

    state
        .service
        .get_one(InstrumentFilter::by_id(id))
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Instrument {} not found", id)))
}

/// Lists the most recent trading days
pub async fn last_trading_days<F: SessionFactory>(
    State(state): State<AppState<F>>,
    query: Result<Query<LastTradingDaysQuery>, QueryRejection>,
) -> Result<Json<Vec<TradingDate>>, ApiError> {
    let Query(query) = query?;
    let raw = query
        .num_dates
        .ok_or_else(|| ApiError::validation("num_dates is required"))?;
    let num_dates = parse_num_dates(&raw)?;

    let days = state.service.get_last_trading_days(i64::from(num_dates)).await?;
    Ok(Json(days))
}

/// Records within a date range, oldest first
pub async fn dynamics<F: SessionFactory>(
    State(state): State<AppState<F>>,
    query: Result<Query<DynamicsQuery>, QueryRejection>,
) -> Result<Json<Page<Instrument>>, ApiError> {
    let Query(query) = query?;
    query.validate()?;

    let page = state
        .service
        .get_dynamics(query.filter(), query.range()?, query.page_request()?)
        .await?;
    Ok(Json(page))
}

/// Records matching the delivery terms, latest trading day first
pub async fn trading_results<F: SessionFactory>(
    State(state): State<AppState<F>>,
    query: Result<Query<TradingResultsQuery>, QueryRejection>,
) -> Result<Json<Page<Instrument>>, ApiError> {
    let Query(query) = query?;
    query.validate()?;

    let page = state
        .service
        .get_trading_results(query.filter(), query.page_request()?)
        .await?;
    Ok(Json(page))
}
