use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::NaiveDate;
use fxrates_core::rates::{ExchangeRateService, InMemoryRateStore, RateDataStore};
use fxrates_market_data::{
    Currency, FxRate, ProviderCapabilities, ProviderRegistry, QuoteConvention, RateFrequency,
    RateProvider, RateSource,
};
use fxrates_server::{api::app_router, build_state, config::Config, AppState};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use tower::ServiceExt;

/// ECB-shaped provider that only serves what the store already holds.
struct StoreOnlyEcb;

#[async_trait]
impl RateProvider for StoreOnlyEcb {
    fn source(&self) -> RateSource {
        RateSource::ECB
    }

    fn base_currency(&self) -> Currency {
        Currency::EUR
    }

    fn quote_convention(&self) -> QuoteConvention {
        QuoteConvention::Indirect
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            frequencies: &[RateFrequency::Daily],
            supports_latest: false,
            supports_historical: false,
        }
    }
}

fn ecb_daily(day: u32, currency: Currency, rate: Decimal) -> FxRate {
    FxRate::new(
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        currency,
        RateSource::ECB,
        RateFrequency::Daily,
        rate,
    )
}

async fn build_test_router() -> Router {
    let store: Arc<dyn RateDataStore> = Arc::new(InMemoryRateStore::with_rates(vec![
        ecb_daily(8, Currency::USD, dec!(1.0950)),
        ecb_daily(8, Currency::GBP, dec!(0.8600)),
        ecb_daily(9, Currency::USD, dec!(1.0960)),
        ecb_daily(9, Currency::GBP, dec!(0.8610)),
    ]));
    let provider: Arc<dyn RateProvider> = Arc::new(StoreOnlyEcb);
    let registry = Arc::new(ProviderRegistry::new(vec![provider]));
    let service = ExchangeRateService::new(store, registry).await.unwrap();

    let config = Config::from_lookup(|_| None).unwrap();
    app_router(AppState::new(Arc::new(service)), &config)
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn assert_close(value: &Value, expected: f64) {
    let actual = value.as_f64().unwrap();
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[tokio::test]
async fn healthz_returns_ok() {
    let app = build_test_router().await;
    let response = get(&app, "/api/v1/healthz").await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn returns_rate_for_base_pair() {
    let app = build_test_router().await;
    let response = get(
        &app,
        "/api/rates?from=EUR&to=USD&date=2024-01-09&source=ECB&frequency=Daily",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["fromCurrency"], "EUR");
    assert_eq!(body["toCurrency"], "USD");
    assert_eq!(body["date"], "2024-01-09");
    assert_eq!(body["source"], "ECB");
    assert_eq!(body["frequency"], "Daily");
    assert_close(&body["rate"], 1.096);
}

#[tokio::test]
async fn weekend_date_uses_latest_earlier_rate() {
    let app = build_test_router().await;
    let response = get(
        &app,
        "/api/rates?from=usd&to=eur&date=2024-01-13&source=ecb&frequency=daily",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["fromCurrency"], "USD");
    assert_close(&body["rate"], 1.0 / 1.096);
}

#[tokio::test]
async fn cross_pair_is_triangulated() {
    let app = build_test_router().await;
    let response = get(
        &app,
        "/api/rates?from=USD&to=GBP&date=2024-01-08&source=ECB&frequency=Daily",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_close(&json_body(response).await["rate"], 0.86 / 1.095);
}

#[tokio::test]
async fn missing_rate_is_not_found_problem() {
    let app = build_test_router().await;
    let response = get(
        &app,
        "/api/rates?from=EUR&to=USD&date=2024-01-05&source=ECB&frequency=Daily",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/problem+json"
    );

    let body = json_body(response).await;
    assert_eq!(body["status"], 404);
    assert_eq!(body["title"], "Exchange rate not found");
    assert_eq!(
        body["detail"],
        "No exchange rate found for EUR to USD on 2024-01-05"
    );
    assert_eq!(
        body["type"],
        "https://tools.ietf.org/html/rfc7231#section-6.5.4"
    );
}

#[tokio::test]
async fn invalid_parameters_are_bad_requests() {
    let app = build_test_router().await;
    for uri in [
        "/api/rates?to=USD&date=2024-01-09&source=ECB&frequency=Daily",
        "/api/rates?from=EUR&to=USD&date=09-01-2024&source=ECB&frequency=Daily",
        "/api/rates?from=EUR&to=USD&date=2024-01-09&source=FED&frequency=Daily",
        "/api/rates?from=EUR&to=XYZ&date=2024-01-09&source=ECB&frequency=Daily",
        "/api/rates?from=EUR&to=USD&date=2024-01-09&source=ECB&frequency=Monthly",
        "/api/rates?from=EUR&to=USD&date=2024-01-09&source=HMRC&frequency=Monthly",
    ] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(json_body(response).await["status"], 400, "{}", uri);
    }
}

#[tokio::test]
async fn unsupported_currency_is_internal_error() {
    let app = build_test_router().await;
    let response = get(
        &app,
        "/api/rates?from=EUR&to=JPY&date=2024-01-09&source=ECB&frequency=Daily",
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    assert_eq!(
        body["title"],
        "An error occurred while processing your request."
    );
    assert!(!body["detail"].as_str().unwrap().contains("JPY"));
}

#[tokio::test]
async fn builds_state_over_sqlite() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("rates.db").to_string_lossy().to_string();
    let config = Config::from_lookup(|key| (key == "FX_DB_PATH").then(|| db_path.clone())).unwrap();
    let state = build_state(&config).await.unwrap();
    let app = app_router(state, &config);

    assert_eq!(get(&app, "/api/v1/healthz").await.status(), StatusCode::OK);

    // No API address configured, so no source is registered.
    let response = get(
        &app,
        "/api/rates?from=EUR&to=USD&date=2024-01-09&source=ECB&frequency=Daily",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
