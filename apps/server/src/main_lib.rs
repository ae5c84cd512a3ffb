use std::sync::Arc;

use crate::config::{Config, LogFormat};
use fxrates_core::rates::{
    ExchangeRateService, ExchangeRateServiceTrait, InMemoryRateStore, RateDataStore,
};
use fxrates_market_data::{BankApiProvider, BankProfile, ProviderRegistry, RateProvider};
use fxrates_storage_sqlite::{create_pool, init, run_migrations, spawn_writer, SqliteRateStore};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub rate_service: Arc<dyn ExchangeRateServiceTrait>,
}

impl AppState {
    pub fn new(rate_service: Arc<dyn ExchangeRateServiceTrait>) -> Arc<Self> {
        Arc::new(Self { rate_service })
    }
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }
}

fn build_store(config: &Config) -> anyhow::Result<Arc<dyn RateDataStore>> {
    match &config.db_path {
        Some(db_path) => {
            let db_path = init(db_path)?;
            tracing::info!("Database path in use: {}", db_path);
            let pool = create_pool(&db_path)?;
            run_migrations(&pool)?;
            let writer = spawn_writer(pool.as_ref().clone());
            Ok(Arc::new(SqliteRateStore::new(pool, writer)))
        }
        None => {
            tracing::warn!("FX_DB_PATH is not set; rates are kept in memory only");
            Ok(Arc::new(InMemoryRateStore::new()))
        }
    }
}

fn build_registry(config: &Config) -> ProviderRegistry {
    let Some(api) = &config.api else {
        tracing::warn!("FX_API_BASE_ADDRESS is not set; no rate providers are registered");
        return ProviderRegistry::new(Vec::new());
    };

    let api = Arc::new(api.clone());
    let client = BankApiProvider::build_client(config.request_timeout);
    let providers: Vec<Arc<dyn RateProvider>> = config
        .sources
        .iter()
        .map(|source| {
            Arc::new(BankApiProvider::with_client(
                BankProfile::for_source(*source),
                api.clone(),
                client.clone(),
            )) as Arc<dyn RateProvider>
        })
        .collect();
    tracing::info!(
        "Registered rate providers: {}",
        config
            .sources
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    ProviderRegistry::new(providers)
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let store = build_store(config)?;
    let registry = Arc::new(build_registry(config));
    let service = ExchangeRateService::new(store, registry).await?;
    Ok(AppState::new(Arc::new(service)))
}
