use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{anyhow, bail, Context};
use chrono::NaiveDate;
use fxrates_market_data::{BankApiConfig, RateSource};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_UPDATE_INTERVAL_SECS: u64 = 6 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

pub struct Config {
    pub listen_addr: SocketAddr,
    /// SQLite file; `None` keeps rates in memory.
    pub db_path: Option<String>,
    /// Rate API connection; without it no providers are registered.
    pub api: Option<BankApiConfig>,
    pub sources: Vec<RateSource>,
    pub request_timeout: Duration,
    pub update_interval: Duration,
    /// Oldest month the scheduler backfills at startup.
    pub min_date: Option<NaiveDate>,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let listen_addr = parse_var(
            "FX_LISTEN_ADDR",
            var("FX_LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
        )?;

        let api = match var("FX_API_BASE_ADDRESS") {
            Some(base_address) => {
                let required = |key: &str| {
                    var(key).ok_or_else(|| anyhow!("{} is required when FX_API_BASE_ADDRESS is set", key))
                };
                Some(BankApiConfig {
                    base_address: base_address.trim_end_matches('/').to_string(),
                    token_endpoint: required("FX_API_TOKEN_ENDPOINT")?,
                    client_id: required("FX_API_CLIENT_ID")?,
                    client_secret: required("FX_API_CLIENT_SECRET")?,
                })
            }
            None => None,
        };

        let sources = match var("FX_SOURCES") {
            Some(list) => parse_sources(&list)?,
            None => RateSource::ALL.to_vec(),
        };

        let timeout_ms: u64 = match var("FX_REQUEST_TIMEOUT_MS") {
            Some(v) => parse_var("FX_REQUEST_TIMEOUT_MS", v)?,
            None => DEFAULT_REQUEST_TIMEOUT_MS,
        };
        if timeout_ms == 0 {
            bail!("FX_REQUEST_TIMEOUT_MS must be greater than zero");
        }

        let interval_secs: u64 = match var("FX_UPDATE_INTERVAL_SECS") {
            Some(v) => parse_var("FX_UPDATE_INTERVAL_SECS", v)?,
            None => DEFAULT_UPDATE_INTERVAL_SECS,
        };
        if interval_secs == 0 {
            bail!("FX_UPDATE_INTERVAL_SECS must be greater than zero");
        }

        let min_date = var("FX_MIN_DATE")
            .map(|v| {
                NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                    .with_context(|| format!("Invalid FX_MIN_DATE '{}', expected yyyy-MM-dd", v))
            })
            .transpose()?;

        let log_format = match var("FX_LOG_FORMAT").map(|v| v.to_ascii_lowercase()) {
            None => LogFormat::Text,
            Some(v) if v == "text" => LogFormat::Text,
            Some(v) if v == "json" => LogFormat::Json,
            Some(v) => bail!("Invalid FX_LOG_FORMAT '{}', expected 'text' or 'json'", v),
        };

        Ok(Self {
            listen_addr,
            db_path: var("FX_DB_PATH"),
            api,
            sources,
            request_timeout: Duration::from_millis(timeout_ms),
            update_interval: Duration::from_secs(interval_secs),
            min_date,
            log_format,
        })
    }
}

fn parse_var<T>(key: &str, value: String) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("Invalid {} '{}'", key, value))
}

fn parse_sources(list: &str) -> anyhow::Result<Vec<RateSource>> {
    let mut sources = Vec::new();
    for item in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let source: RateSource = parse_var("FX_SOURCES", item.to_string())?;
        if !sources.contains(&source) {
            sources.push(source);
        }
    }
    if sources.is_empty() {
        bail!("FX_SOURCES must name at least one source");
    }
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.listen_addr.to_string(), "0.0.0.0:8080");
        assert!(config.db_path.is_none());
        assert!(config.api.is_none());
        assert_eq!(config.sources, RateSource::ALL.to_vec());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.update_interval, Duration::from_secs(21_600));
        assert!(config.min_date.is_none());
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_api_settings_require_credentials() {
        let err = config(&[("FX_API_BASE_ADDRESS", "https://rates.example")])
            .err()
            .unwrap();
        assert!(err.to_string().contains("FX_API_TOKEN_ENDPOINT"));

        let config = config(&[
            ("FX_API_BASE_ADDRESS", "https://rates.example/"),
            ("FX_API_TOKEN_ENDPOINT", "https://auth.example/token"),
            ("FX_API_CLIENT_ID", "id"),
            ("FX_API_CLIENT_SECRET", "secret"),
        ])
        .unwrap();
        assert_eq!(config.api.unwrap().base_address, "https://rates.example");
    }

    #[test]
    fn test_sources_list() {
        let config = config(&[("FX_SOURCES", "ecb, hmrc,ECB")]).unwrap();
        assert_eq!(config.sources, vec![RateSource::ECB, RateSource::HMRC]);
    }

    #[test]
    fn test_invalid_values_fail() {
        assert!(config(&[("FX_SOURCES", "ECB,FED")]).is_err());
        assert!(config(&[("FX_LISTEN_ADDR", "nowhere")]).is_err());
        assert!(config(&[("FX_REQUEST_TIMEOUT_MS", "soon")]).is_err());
        assert!(config(&[("FX_UPDATE_INTERVAL_SECS", "0")]).is_err());
        assert!(config(&[("FX_MIN_DATE", "01/02/2024")]).is_err());
        assert!(config(&[("FX_LOG_FORMAT", "xml")]).is_err());
    }

    #[test]
    fn test_min_date_and_json_logs() {
        let config = config(&[("FX_MIN_DATE", "2020-01-15"), ("FX_LOG_FORMAT", "JSON")]).unwrap();
        assert_eq!(config.min_date, NaiveDate::from_ymd_opt(2020, 1, 15));
        assert_eq!(config.log_format, LogFormat::Json);
    }
}
