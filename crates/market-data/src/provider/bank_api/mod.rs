//! Central bank rate API provider.
//!
//! One HTTP API serves every supported bank; a [`BankProfile`] selects the
//! bank and declares its base currency, quote convention and published
//! frequencies. Requests authenticate with an OAuth client-credentials token
//! which is cached until shortly before it expires.
//!
//! Endpoints (relative to the configured base address):
//! - `GET /v1/Banks/{bankId}/DailyRates/Latest`
//! - `GET /v1/Banks/{bankId}/DailyRates/TimeSeries?startDate=..&endDate=..`
//! - `GET /v1/Banks/{bankId}/{Weekly|Biweekly|Monthly}Rates/Latest`
//! - `GET /v1/Banks/{bankId}/{Weekly|Biweekly|Monthly}Rates/{year}/{month}`

mod models;
mod profile;

pub use models::{ExchangeRatesResponse, RateEntry};
pub use profile::{BankProfile, ALL_PROFILES, ECB, HMRC, MNB, MXCB, PLCB, SECB};

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::errors::MarketDataError;
use crate::models::{Currency, FxRate, QuoteConvention, RateFrequency, RateSource};
use crate::period::{day_chunks, months_in_range};
use crate::provider::{validate_range, ProviderCapabilities, RateProvider};

use models::TokenResponse;

/// Default HTTP request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest range the time-series endpoint accepts in one request.
pub const MAX_QUERY_INTERVAL_DAYS: i64 = 180;

/// The daily "latest" window covers today and the four days before it.
const LATEST_DAILY_WINDOW_DAYS: i64 = 4;

const TOKEN_SCOPE: &str = "fx_api";

/// Tokens are refreshed this long before the issuer's stated expiry.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// Connection settings for the rate API.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankApiConfig {
    pub base_address: String,
    pub token_endpoint: String,
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for BankApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BankApiConfig")
            .field("base_address", &self.base_address)
            .field("token_endpoint", &self.token_endpoint)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

struct CachedToken {
    value: String,
    expires_at: Option<Instant>,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        self.expires_at.map_or(false, |at| Instant::now() < at)
    }
}

/// Rate provider backed by the central bank rate API.
pub struct BankApiProvider {
    profile: &'static BankProfile,
    config: Arc<BankApiConfig>,
    client: Client,
    token: Mutex<Option<CachedToken>>,
}

impl BankApiProvider {
    /// Create a provider with its own HTTP client using [`REQUEST_TIMEOUT`].
    pub fn new(profile: &'static BankProfile, config: Arc<BankApiConfig>) -> Self {
        Self::with_client(profile, config, Self::build_client(REQUEST_TIMEOUT))
    }

    /// Create a provider sharing an existing HTTP client.
    pub fn with_client(
        profile: &'static BankProfile,
        config: Arc<BankApiConfig>,
        client: Client,
    ) -> Self {
        Self {
            profile,
            config,
            client,
            token: Mutex::new(None),
        }
    }

    /// HTTP client whose timeout bounds every provider call.
    pub fn build_client(timeout: Duration) -> Client {
        Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new())
    }

    pub fn profile(&self) -> &'static BankProfile {
        self.profile
    }

    fn provider_name(&self) -> String {
        self.profile.source.to_string()
    }

    fn series_segment(frequency: RateFrequency) -> &'static str {
        match frequency {
            RateFrequency::Daily => "DailyRates",
            RateFrequency::Weekly => "WeeklyRates",
            RateFrequency::BiWeekly => "BiweeklyRates",
            RateFrequency::Monthly => "MonthlyRates",
        }
    }

    fn latest_path(&self, frequency: RateFrequency) -> String {
        format!(
            "/v1/Banks/{}/{}/Latest",
            self.profile.bank_id,
            Self::series_segment(frequency)
        )
    }

    fn month_path(&self, frequency: RateFrequency, year: i32, month: u32) -> String {
        format!(
            "/v1/Banks/{}/{}/{}/{}",
            self.profile.bank_id,
            Self::series_segment(frequency),
            year,
            month
        )
    }

    fn time_series_path(&self) -> String {
        format!(
            "/v1/Banks/{}/{}/TimeSeries",
            self.profile.bank_id,
            Self::series_segment(RateFrequency::Daily)
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_address.trim_end_matches('/'), path)
    }

    fn ensure_supported(&self, frequency: RateFrequency, kind: &str) -> Result<(), MarketDataError> {
        if self.profile.frequencies.contains(&frequency) {
            Ok(())
        } else {
            Err(MarketDataError::NotSupported {
                operation: format!("{} {} rates", kind, frequency),
                provider: self.provider_name(),
            })
        }
    }

    fn transport_error(&self, error: reqwest::Error) -> MarketDataError {
        if error.is_timeout() {
            MarketDataError::Timeout {
                provider: self.provider_name(),
            }
        } else {
            MarketDataError::Network(error)
        }
    }

    async fn access_token(&self) -> Result<String, MarketDataError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_valid()) {
            return Ok(token.value.clone());
        }

        debug!("{}: requesting access token", self.provider_name());
        let response = self
            .client
            .post(&self.config.token_endpoint)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("scope", TOKEN_SCOPE),
            ])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketDataError::Unauthorized {
                provider: self.provider_name(),
                message: format!(
                    "Token request failed. StatusCode: {}, ResponseBody: {}",
                    status.as_u16(),
                    body
                ),
            });
        }

        let token: TokenResponse = response.json().await.map_err(|e| MarketDataError::Parse {
            provider: self.provider_name(),
            message: format!("token response: {}", e),
        })?;

        let expires_at = token.expires_in.and_then(|secs| {
            Duration::from_secs(secs)
                .checked_sub(TOKEN_EXPIRY_MARGIN)
                .map(|lifetime| Instant::now() + lifetime)
        });
        let value = token.access_token;
        *cached = Some(CachedToken {
            value: value.clone(),
            expires_at,
        });
        Ok(value)
    }

    async fn fetch(
        &self,
        path: &str,
        query: &[(&'static str, String)],
        frequency: RateFrequency,
    ) -> Result<Vec<FxRate>, MarketDataError> {
        let token = self.access_token().await?;
        let url = self.url(path);
        debug!("{}: GET {} {:?}", self.provider_name(), url, query);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .query(query)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = format!(
                "Exchange rate API request failed. BankId: {}, StatusCode: {}, ResponseBody: {}",
                self.profile.bank_id,
                status.as_u16(),
                body
            );
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                // Force a fresh token on the next call.
                self.token.lock().await.take();
                return Err(MarketDataError::Unauthorized {
                    provider: self.provider_name(),
                    message,
                });
            }
            return Err(MarketDataError::ProviderError {
                provider: self.provider_name(),
                message,
            });
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        let payload: ExchangeRatesResponse =
            serde_json::from_str(&body).map_err(|e| MarketDataError::Parse {
                provider: self.provider_name(),
                message: e.to_string(),
            })?;

        let rates = payload.into_rates(self.profile.source, frequency);
        if rates.is_empty() {
            warn!("{}: {} returned no rates", self.provider_name(), path);
        }
        Ok(rates)
    }

    async fn fetch_daily_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FxRate>, MarketDataError> {
        let path = self.time_series_path();
        let mut results = Vec::new();
        for (start, end) in day_chunks(from, to, MAX_QUERY_INTERVAL_DAYS) {
            let query = [
                ("startDate", start.format("%Y-%m-%d").to_string()),
                ("endDate", end.format("%Y-%m-%d").to_string()),
            ];
            results.extend(self.fetch(&path, &query, RateFrequency::Daily).await?);
        }
        Ok(results)
    }

    async fn fetch_monthly_range(
        &self,
        frequency: RateFrequency,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FxRate>, MarketDataError> {
        let mut results = Vec::new();
        for (year, month) in months_in_range(from, to) {
            let path = self.month_path(frequency, year, month);
            results.extend(self.fetch(&path, &[], frequency).await?);
        }
        Ok(results)
    }
}

#[async_trait]
impl RateProvider for BankApiProvider {
    fn source(&self) -> RateSource {
        self.profile.source
    }

    fn base_currency(&self) -> Currency {
        self.profile.currency
    }

    fn quote_convention(&self) -> QuoteConvention {
        self.profile.convention
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            frequencies: self.profile.frequencies,
            supports_latest: true,
            supports_historical: true,
        }
    }

    async fn get_latest_rates(
        &self,
        frequency: RateFrequency,
    ) -> Result<Vec<FxRate>, MarketDataError> {
        self.ensure_supported(frequency, "latest")?;
        match frequency {
            RateFrequency::Daily => {
                let today = Utc::now().date_naive();
                let from = today - ChronoDuration::days(LATEST_DAILY_WINDOW_DAYS);
                self.fetch_daily_range(from, today).await
            }
            _ => self.fetch(&self.latest_path(frequency), &[], frequency).await,
        }
    }

    async fn get_historical_rates(
        &self,
        frequency: RateFrequency,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FxRate>, MarketDataError> {
        validate_range(from, to)?;
        self.ensure_supported(frequency, "historical")?;
        match frequency {
            RateFrequency::Daily => self.fetch_daily_range(from, to).await,
            _ => self.fetch_monthly_range(frequency, from, to).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Arc<BankApiConfig> {
        Arc::new(BankApiConfig {
            base_address: "https://rates.example.test/".to_string(),
            token_endpoint: "https://auth.example.test/token".to_string(),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
        })
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_descriptor_comes_from_profile() {
        let provider = BankApiProvider::new(&MNB, config());
        assert_eq!(provider.source(), RateSource::MNB);
        assert_eq!(provider.base_currency(), Currency::HUF);
        assert_eq!(provider.quote_convention(), QuoteConvention::Direct);
        assert!(provider.supports(RateFrequency::Daily));
        assert!(!provider.supports(RateFrequency::Monthly));
    }

    #[test]
    fn test_paths() {
        let provider = BankApiProvider::new(&ECB, config());
        assert_eq!(
            provider.url(&provider.latest_path(RateFrequency::Daily)),
            "https://rates.example.test/v1/Banks/EUECB/DailyRates/Latest"
        );
        assert_eq!(
            provider.month_path(RateFrequency::Monthly, 2024, 3),
            "/v1/Banks/EUECB/MonthlyRates/2024/3"
        );
        assert_eq!(
            provider.month_path(RateFrequency::BiWeekly, 2024, 11),
            "/v1/Banks/EUECB/BiweeklyRates/2024/11"
        );
        assert_eq!(
            provider.time_series_path(),
            "/v1/Banks/EUECB/DailyRates/TimeSeries"
        );
    }

    #[tokio::test]
    async fn test_unsupported_frequency_fails_without_request() {
        let provider = BankApiProvider::new(&HMRC, config());
        let err = provider
            .get_latest_rates(RateFrequency::Daily)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketDataError::NotSupported { .. }));

        let err = provider
            .get_historical_rates(RateFrequency::Weekly, date(2024, 1, 1), date(2024, 2, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, MarketDataError::NotSupported { .. }));
    }

    #[tokio::test]
    async fn test_inverted_range_is_rejected() {
        let provider = BankApiProvider::new(&ECB, config());
        let err = provider
            .get_historical_rates(RateFrequency::Daily, date(2024, 2, 1), date(2024, 1, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, MarketDataError::InvalidRange { .. }));
    }

    #[test]
    fn test_config_debug_hides_secret() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("secret\""));
        assert!(rendered.contains("<redacted>"));
    }
}
