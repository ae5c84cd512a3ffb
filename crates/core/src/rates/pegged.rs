//! Fixed-peg currencies.

use std::collections::HashMap;

use fxrates_market_data::Currency;
use log::{debug, info};
use rust_decimal_macros::dec;

use super::rates_model::PeggedCurrency;
use super::rates_traits::RateDataStore;
use crate::errors::Result;

/// Pegs used when the data store defines none.
pub fn default_pegged_currencies() -> Vec<PeggedCurrency> {
    use Currency::*;
    [
        (XCD, USD, dec!(0.37007)),
        (DJF, USD, dec!(0.00562)),
        (HKD, USD, dec!(0.12850)),
        (BAM, EUR, dec!(0.60000)),
        (XPF, EUR, dec!(0.00838)),
        (BND, SGD, dec!(1.00000)),
        (MOP, HKD, dec!(0.16890)),
        (AWG, USD, dec!(0.55866)),
        (BSD, USD, dec!(1.00000)),
        (BHD, USD, dec!(2.65957)),
        (BBD, USD, dec!(0.50000)),
        (BZD, USD, dec!(0.49600)),
        (ANG, USD, dec!(0.55900)),
        (ERN, USD, dec!(0.06667)),
        (JOD, USD, dec!(1.41044)),
        (OMR, USD, dec!(2.60078)),
        (PAB, USD, dec!(1.00000)),
        (QAR, USD, dec!(0.27473)),
        (SAR, USD, dec!(0.26667)),
        (TMT, USD, dec!(0.29777)),
        (AED, USD, dec!(0.27229)),
        (XOF, EUR, dec!(0.00152)),
        (CVE, EUR, dec!(0.00907)),
        (XAF, EUR, dec!(0.00152)),
        (KMF, EUR, dec!(0.00203)),
    ]
    .into_iter()
    .map(|(currency, pegged_to, rate)| PeggedCurrency::new(currency, pegged_to, rate))
    .collect()
}

/// Immutable peg lookup, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct PeggedCurrencyTable {
    pegs: HashMap<Currency, PeggedCurrency>,
}

impl PeggedCurrencyTable {
    /// Later entries for the same currency replace earlier ones.
    pub fn new(pegs: impl IntoIterator<Item = PeggedCurrency>) -> Self {
        Self {
            pegs: pegs.into_iter().map(|p| (p.currency, p)).collect(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_pegged_currencies())
    }

    /// Pegs from the store, or the defaults when the store has none.
    pub async fn load(store: &dyn RateDataStore) -> Result<Self> {
        let stored = store.get_pegged_currencies().await?;
        if stored.is_empty() {
            info!("No pegged currencies in store, using defaults");
            return Ok(Self::with_defaults());
        }
        debug!("Loaded {} pegged currencies from store", stored.len());
        Ok(Self::new(stored))
    }

    pub fn get(&self, currency: Currency) -> Option<&PeggedCurrency> {
        self.pegs.get(&currency)
    }

    pub fn len(&self) -> usize {
        self.pegs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pegs.is_empty()
    }
}
