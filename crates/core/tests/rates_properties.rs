//! Property-based tests for rate resolution and the rate cache.
//!
//! Uses `proptest` to check the algebraic properties quotes must satisfy
//! for arbitrary rates, plus idempotence of cache saves.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use fxrates_core::rates::{
    ExchangeRateService, ExchangeRateServiceTrait, InMemoryRateStore, PeggedCurrencyTable,
    QuoteResolver, RateSurface, RateSurfaceCache,
};
use fxrates_market_data::{
    Currency, FxRate, ProviderCapabilities, ProviderRegistry, QuoteConvention, RateFrequency,
    RateProvider, RateSource,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// =============================================================================
// Helpers
// =============================================================================

const TOLERANCE: Decimal = dec!(0.0000000001);

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
}

fn approx_eq(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() <= TOLERANCE * Decimal::ONE.max(b.abs())
}

/// Answers from the store only.
struct StoreOnlyProvider;

#[async_trait]
impl RateProvider for StoreOnlyProvider {
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

// =============================================================================
// Generators
// =============================================================================

/// Positive rates between 0.0001 and 1000 with four decimal places.
fn arb_rate() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|mantissa| Decimal::new(mantissa, 4))
}

/// Any currency except the EUR base and the pegged currencies.
fn arb_quoted_currency() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::USD),
        Just(Currency::GBP),
        Just(Currency::JPY),
        Just(Currency::CHF),
        Just(Currency::PLN),
        Just(Currency::SEK),
    ]
}

fn arb_convention() -> impl Strategy<Value = QuoteConvention> {
    prop_oneof![Just(QuoteConvention::Direct), Just(QuoteConvention::Indirect)]
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A -> base -> A is the identity, whatever the convention.
    #[test]
    fn prop_reciprocal_symmetry(
        rate in arb_rate(),
        currency in arb_quoted_currency(),
        convention in arb_convention(),
    ) {
        let mut surface = RateSurface::new();
        surface.insert(currency, day(), rate);
        let pegged = PeggedCurrencyTable::default();
        let resolver = QuoteResolver {
            surface: &surface,
            source: RateSource::ECB,
            base_currency: Currency::EUR,
            convention,
            pegged: &pegged,
        };

        let there = resolver.resolve(currency, Currency::EUR, day()).unwrap();
        let back = resolver.resolve(Currency::EUR, currency, day()).unwrap();
        prop_assert!(approx_eq(there * back, Decimal::ONE));
    }

    /// quote(A -> base) * quote(base -> C) == rate(A -> C).
    #[test]
    fn prop_triangulation_identity(
        a_rate in arb_rate(),
        c_rate in arb_rate(),
    ) {
        let rates = vec![
            FxRate::new(day(), Currency::USD, RateSource::ECB, RateFrequency::Daily, a_rate),
            FxRate::new(day(), Currency::GBP, RateSource::ECB, RateFrequency::Daily, c_rate),
        ];

        let surface = RateSurface::from_rates(&rates);
        let pegged = PeggedCurrencyTable::default();
        let resolver = QuoteResolver {
            surface: &surface,
            source: RateSource::ECB,
            base_currency: Currency::EUR,
            convention: QuoteConvention::Indirect,
            pegged: &pegged,
        };
        let first_leg = resolver.resolve(Currency::USD, Currency::EUR, day()).unwrap();
        let second_leg = resolver.resolve(Currency::EUR, Currency::GBP, day()).unwrap();

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let cross = runtime.block_on(async {
            let store = Arc::new(InMemoryRateStore::with_rates(rates));
            let registry = Arc::new(ProviderRegistry::new(vec![Arc::new(StoreOnlyProvider)]));
            let service = ExchangeRateService::new(store, registry).await.unwrap();
            service
                .get_rate(Currency::USD, Currency::GBP, day(), RateSource::ECB, RateFrequency::Daily)
                .await
                .unwrap()
                .unwrap()
        });

        prop_assert!(approx_eq(first_leg * second_leg, cross));
        prop_assert!(approx_eq(cross, c_rate / a_rate));
    }

    /// Saving the same rates twice persists nothing the second time.
    #[test]
    fn prop_equal_save_is_a_no_op(
        rates in prop::collection::vec((arb_quoted_currency(), arb_rate()), 1..10),
    ) {
        let mut seen = HashSet::new();
        let rates: Vec<FxRate> = rates
            .into_iter()
            .filter(|(currency, _)| seen.insert(*currency))
            .map(|(currency, rate)| {
                FxRate::new(day(), currency, RateSource::ECB, RateFrequency::Daily, rate)
            })
            .collect();

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (first, second) = runtime.block_on(async {
            let cache = RateSurfaceCache::new(Arc::new(InMemoryRateStore::new()));
            let first = cache.save(&rates).await.unwrap();
            let second = cache.save(&rates).await.unwrap();
            (first, second)
        });

        prop_assert_eq!(first.inserted, rates.len());
        prop_assert_eq!(second.persisted(), 0);
        prop_assert_eq!(second.unchanged, rates.len());
    }
}
