use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use fxrates_market_data::{RateFrequency, RateSource};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{ExchangeRateResponse, RateQuery},
};

fn required(value: Option<String>, name: &str) -> ApiResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("Query parameter '{}' is required", name)))
}

fn parse_param<T: FromStr>(value: Option<String>, name: &str) -> ApiResult<T>
where
    T::Err: std::fmt::Display,
{
    let raw = required(value, name)?;
    raw.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid '{}': {}", name, e)))
}

fn parse_date(value: Option<String>) -> ApiResult<NaiveDate> {
    let raw = required(value, "date")?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
        ApiError::BadRequest(format!("Invalid 'date': '{}' is not a yyyy-MM-dd date", raw))
    })
}

async fn get_rate(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RateQuery>,
) -> ApiResult<Json<ExchangeRateResponse>> {
    let from = required(query.from, "from")?.to_ascii_uppercase();
    let to = required(query.to, "to")?.to_ascii_uppercase();
    let date = parse_date(query.date)?;
    let source: RateSource = parse_param(query.source, "source")?;
    let frequency: RateFrequency = parse_param(query.frequency, "frequency")?;

    let rate = state
        .rate_service
        .get_rate_by_code(&from, &to, date, source, frequency)
        .await?
        .ok_or_else(|| ApiError::RateNotFound {
            from: from.clone(),
            to: to.clone(),
            date,
        })?;

    Ok(Json(ExchangeRateResponse {
        from_currency: from,
        to_currency: to,
        date,
        source,
        frequency,
        rate,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/rates", get(get_rate))
        .route("/api/rates/", get(get_rate))
}
