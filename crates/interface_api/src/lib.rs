//! HTTP API Layer
//!
//! This crate exposes the trading results service over HTTP using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for health and instrument queries
//! - **Middleware**: Request ids, tracing, request logging, timeouts
//! - **DTOs**: Query-string shapes with validation
//! - **Error Handling**: Consistent error responses
//!
//! The router is generic over the session factory, so the same routes run
//! against PostgreSQL in the server and against the in-memory store in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//! use infra_db::PgSessionFactory;
//!
//! let app = create_router(PgSessionFactory::new(pool), config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{http::HeaderName, middleware as axum_middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use domain_instrument::{InstrumentService, SessionFactory};

use crate::config::ApiConfig;
use crate::handlers::{health, instrument};
use crate::middleware::request_logging;

/// Application state shared across handlers
pub struct AppState<F> {
    pub service: Arc<InstrumentService<F>>,
    pub config: ApiConfig,
}

impl<F> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            config: self.config.clone(),
        }
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `sessions` - Session factory backing the instrument service
/// * `config` - API configuration
pub fn create_router<F: SessionFactory>(sessions: F, config: ApiConfig) -> Router {
    let request_timeout = config.request_timeout();
    let state = AppState {
        service: Arc::new(InstrumentService::new(sessions)),
        config,
    };
    let request_id = HeaderName::from_static("x-request-id");

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check::<F>));

    let instrument_routes = Router::new()
        .route("/", get(instrument::list_instruments::<F>))
        .route("/last-trading-days", get(instrument::last_trading_days::<F>))
        .route("/dynamics", get(instrument::dynamics::<F>))
        .route("/trading-results", get(instrument::trading_results::<F>))
        .route("/:id", get(instrument::get_instrument::<F>));

    let api_routes = Router::new()
        .nest("/instrument", instrument_routes)
        .layer(axum_middleware::from_fn(request_logging));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
