//! HTTP tests over the in-memory session factory

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::Value;

use core_kernel::Page;
use domain_instrument::{Instrument, MockSessionFactory, NewInstrument, TradingDate, NUM_DATES_MESSAGE};
use interface_api::{config::ApiConfig, create_router, error::ErrorResponse, handlers::health::HealthResponse};
use test_utils::{assert_page_matches, assert_strictly_descending, ymd, InstrumentFixtures};

async fn server_with(records: Vec<NewInstrument>) -> (TestServer, MockSessionFactory) {
    let factory = MockSessionFactory::with_instruments(records).await;
    let app = create_router(factory.clone(), ApiConfig::default());
    (TestServer::new(app).unwrap(), factory)
}

mod health {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let (server, _) = server_with(Vec::new()).await;

        let response = server.get("/health").await;

        response.assert_status_ok();
        assert_eq!(response.json::<HealthResponse>().status, "healthy");
    }

    #[tokio::test]
    async fn test_readiness_reports_unavailable_store() {
        let (server, factory) = server_with(Vec::new()).await;
        server.get("/health/ready").await.assert_status_ok();

        factory.refuse_sessions(true);
        let response = server.get("/health/ready").await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.json::<ErrorResponse>().error, "service_unavailable");
    }

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let (server, _) = server_with(Vec::new()).await;

        let response = server.get("/health").await;

        assert!(response.headers().contains_key("x-request-id"));
    }
}

mod last_trading_days {
    use super::*;

    #[tokio::test]
    async fn test_returns_latest_days() {
        let (server, _) = server_with(InstrumentFixtures::five_trading_days()).await;

        let response = server
            .get("/api/v1/instrument/last-trading-days")
            .add_query_param("num_dates", 3)
            .await;

        response.assert_status_ok();
        let days: Vec<TradingDate> = response.json();
        assert_strictly_descending(&days);
        let dates: Vec<_> = days.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![ymd(2024, 2, 20), ymd(2024, 2, 19), ymd(2024, 2, 18)]);
    }

    #[tokio::test]
    async fn test_serializes_as_date_objects() {
        let (server, _) = server_with(InstrumentFixtures::five_trading_days()).await;

        let body: Value = server
            .get("/api/v1/instrument/last-trading-days")
            .add_query_param("num_dates", 1)
            .await
            .json();

        assert_eq!(body, serde_json::json!([{ "date": "2024-02-20" }]));
    }

    #[tokio::test]
    async fn test_invalid_counts_are_400() {
        let (server, factory) = server_with(InstrumentFixtures::five_trading_days()).await;

        for raw in ["0", "-1", "abc"] {
            let response = server
                .get("/api/v1/instrument/last-trading-days")
                .add_query_param("num_dates", raw)
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
            assert_eq!(response.json::<ErrorResponse>().message, NUM_DATES_MESSAGE);
        }
        assert_eq!(factory.journal().opened(), 0);
    }

    #[tokio::test]
    async fn test_missing_count_is_422() {
        let (server, _) = server_with(InstrumentFixtures::five_trading_days()).await;

        let response = server.get("/api/v1/instrument/last-trading-days").await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_unavailable_store_is_503() {
        let (server, factory) = server_with(InstrumentFixtures::five_trading_days()).await;
        factory.refuse_sessions(true);

        let response = server
            .get("/api/v1/instrument/last-trading-days")
            .add_query_param("num_dates", 3)
            .await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_query_failure_is_500() {
        let (server, factory) = server_with(InstrumentFixtures::five_trading_days()).await;
        factory.fail_queries(true);

        let response = server
            .get("/api/v1/instrument/last-trading-days")
            .add_query_param("num_dates", 3)
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(factory.journal().rolled_back(), 1);
        assert_eq!(factory.journal().closed(), 1);
    }
}

mod dynamics {
    use super::*;
    use core_kernel::DateRange;
    use domain_instrument::InstrumentFilter;

    #[tokio::test]
    async fn test_filters_by_terms_and_range() {
        let (server, _) = server_with(InstrumentFixtures::mixed_terms()).await;

        let response = server
            .get("/api/v1/instrument/dynamics")
            .add_query_param("oil_id", "A10K")
            .add_query_param("delivery_type_id", "W")
            .add_query_param("delivery_basis_id", "ZLY")
            .add_query_param("start_date", "2024-02-10")
            .add_query_param("end_date", "2024-02-11")
            .await;

        response.assert_status_ok();
        let page: Page<Instrument> = response.json();
        let filter = InstrumentFilter::all()
            .oil_id("A10K")
            .delivery_type_id("W")
            .delivery_basis_id("ZLY");
        let range = DateRange::new(ymd(2024, 2, 10), ymd(2024, 2, 11)).unwrap();
        assert_eq!(page.total, 2);
        assert_page_matches(&page, &filter, Some(range));
    }

    #[tokio::test]
    async fn test_start_after_end_is_422() {
        let (server, factory) = server_with(InstrumentFixtures::mixed_terms()).await;

        let response = server
            .get("/api/v1/instrument/dynamics")
            .add_query_param("start_date", "2024-02-11")
            .add_query_param("end_date", "2024-02-10")
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: ErrorResponse = response.json();
        assert_eq!(body.error, "validation_error");
        assert!(body.details.unwrap_or_default().iter().any(|d| d.contains("start_date")));
        assert_eq!(factory.journal().opened(), 0);
    }

    #[tokio::test]
    async fn test_missing_dates_are_422() {
        let (server, _) = server_with(InstrumentFixtures::mixed_terms()).await;

        let response = server
            .get("/api/v1/instrument/dynamics")
            .add_query_param("start_date", "2024-02-10")
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_malformed_date_is_422() {
        let (server, _) = server_with(InstrumentFixtures::mixed_terms()).await;

        let response = server
            .get("/api/v1/instrument/dynamics")
            .add_query_param("start_date", "10.02.2024")
            .add_query_param("end_date", "2024-02-11")
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_overlong_oil_id_is_422() {
        let (server, _) = server_with(InstrumentFixtures::mixed_terms()).await;

        let response = server
            .get("/api/v1/instrument/dynamics")
            .add_query_param("oil_id", "A10KXX")
            .add_query_param("start_date", "2024-02-10")
            .add_query_param("end_date", "2024-02-11")
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}

mod trading_results {
    use super::*;

    #[tokio::test]
    async fn test_unfiltered_returns_all_rows_paged() {
        let (server, _) = server_with(InstrumentFixtures::mixed_terms()).await;

        let response = server
            .get("/api/v1/instrument/trading-results")
            .add_query_param("page", 1)
            .add_query_param("size", 5)
            .await;

        response.assert_status_ok();
        let page: Page<Instrument> = response.json();
        assert_eq!(page.total, 7);
        assert_eq!(page.pages, 2);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.items[0].date, ymd(2024, 2, 12));
    }

    #[tokio::test]
    async fn test_page_size_over_limit_is_422() {
        let (server, _) = server_with(InstrumentFixtures::mixed_terms()).await;

        let response = server
            .get("/api/v1/instrument/trading-results")
            .add_query_param("size", 101)
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}

mod records {
    use super::*;

    #[tokio::test]
    async fn test_list_with_filter() {
        let (server, _) = server_with(InstrumentFixtures::mixed_terms()).await;

        let rows: Vec<Instrument> = server
            .get("/api/v1/instrument")
            .add_query_param("oil_id", "A592")
            .await
            .json();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].oil_id, "A592");
    }

    #[tokio::test]
    async fn test_get_by_id_accepts_prefixed_ids() {
        let (server, _) = server_with(InstrumentFixtures::mixed_terms()).await;

        let plain: Instrument = server.get("/api/v1/instrument/2").await.json();
        let prefixed: Instrument = server.get("/api/v1/instrument/INS-2").await.json();

        assert_eq!(plain, prefixed);
        assert_eq!(plain.date, ymd(2024, 2, 10));
    }

    #[tokio::test]
    async fn test_missing_record_is_404() {
        let (server, _) = server_with(InstrumentFixtures::mixed_terms()).await;

        let response = server.get("/api/v1/instrument/999").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<ErrorResponse>().error, "not_found");
    }

    #[tokio::test]
    async fn test_malformed_id_is_400() {
        let (server, _) = server_with(InstrumentFixtures::mixed_terms()).await;

        server
            .get("/api/v1/instrument/not-a-number")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
