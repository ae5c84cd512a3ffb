//! Provider registry: source → provider lookup.

use std::sync::Arc;

use log::warn;

use crate::errors::MarketDataError;
use crate::models::RateSource;
use crate::provider::RateProvider;

/// Registered rate providers, one per source, in registration order.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn RateProvider>>,
}

impl ProviderRegistry {
    /// Create a registry from a list of providers.
    ///
    /// When two providers claim the same source the later one wins and a
    /// warning is logged.
    pub fn new(providers: Vec<Arc<dyn RateProvider>>) -> Self {
        let mut registry = Self::default();
        for provider in providers {
            registry.register(provider);
        }
        registry
    }

    pub fn register(&mut self, provider: Arc<dyn RateProvider>) {
        let source = provider.source();
        if let Some(slot) = self.providers.iter_mut().find(|p| p.source() == source) {
            warn!("Provider for {} registered twice; keeping the last one", source);
            *slot = provider;
        } else {
            self.providers.push(provider);
        }
    }

    /// Provider publishing `source`.
    pub fn get(&self, source: RateSource) -> Result<Arc<dyn RateProvider>, MarketDataError> {
        self.providers
            .iter()
            .find(|p| p.source() == source)
            .cloned()
            .ok_or(MarketDataError::UnknownSource(source))
    }

    pub fn contains(&self, source: RateSource) -> bool {
        self.providers.iter().any(|p| p.source() == source)
    }

    /// Registered sources in registration order.
    pub fn sources(&self) -> Vec<RateSource> {
        self.providers.iter().map(|p| p.source()).collect()
    }

    pub fn providers(&self) -> &[Arc<dyn RateProvider>] {
        &self.providers
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("sources", &self.sources())
            .finish()
    }
}
