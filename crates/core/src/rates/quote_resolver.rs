//! Pure quote resolution over a rate surface.

use chrono::NaiveDate;
use fxrates_market_data::{Currency, QuoteConvention, RateSource};
use rust_decimal::Decimal;

use super::pegged::PeggedCurrencyTable;
use super::rates_errors::RateError;
use super::rates_model::RateSurface;

/// Resolves single-hop quotes against one source's base currency.
///
/// One side of every pair must be the base currency; the facade triangulates
/// other pairs before calling in. Currencies without a series fall back to
/// their peg, and missing dates fall back to the most recent earlier date no
/// older than the surface's minimum date.
pub struct QuoteResolver<'a> {
    pub surface: &'a RateSurface,
    pub source: RateSource,
    pub base_currency: Currency,
    pub convention: QuoteConvention,
    pub pegged: &'a PeggedCurrencyTable,
}

impl<'a> QuoteResolver<'a> {
    pub fn resolve(&self, from: Currency, to: Currency, date: NaiveDate) -> Result<Decimal, RateError> {
        let mut chain = Vec::new();
        self.resolve_with_chain(from, to, date, &mut chain)
    }

    fn resolve_with_chain(
        &self,
        from: Currency,
        to: Currency,
        date: NaiveDate,
        chain: &mut Vec<Currency>,
    ) -> Result<Decimal, RateError> {
        if from == to {
            return Ok(Decimal::ONE);
        }

        let base = self.base_currency;
        if from != base && to != base {
            return Err(RateError::RequiresTriangulation { from, to, base });
        }

        let to_base = to == base;
        let lookup = if to_base { from } else { to };

        if !self.surface.has_series(lookup) {
            let peg = self.pegged.get(lookup).ok_or(RateError::UnsupportedCurrency {
                currency: lookup,
                rate_source: self.source,
            })?;

            if chain.contains(&lookup) {
                chain.push(lookup);
                return Err(RateError::CircularPeg {
                    currency: lookup,
                    chain: format_chain(chain),
                });
            }
            chain.push(lookup);

            let inner = self.resolve_with_chain(base, peg.pegged_to, date, chain)?;
            return if to_base {
                divide(peg.rate, inner, lookup, date)
            } else {
                divide(inner, peg.rate, lookup, date)
            };
        }

        let (_, rate) = self
            .surface
            .latest_on_or_before(lookup, date)
            .ok_or(RateError::NoRateFound {
                lookup_currency: lookup,
                date,
            })?;

        let stored_as_is = matches!(
            (self.convention, to_base),
            (QuoteConvention::Direct, true) | (QuoteConvention::Indirect, false)
        );
        if stored_as_is {
            Ok(rate)
        } else {
            divide(Decimal::ONE, rate, lookup, date)
        }
    }
}

fn divide(
    numerator: Decimal,
    denominator: Decimal,
    currency: Currency,
    date: NaiveDate,
) -> Result<Decimal, RateError> {
    numerator
        .checked_div(denominator)
        .ok_or(RateError::ZeroRate { currency, date })
}

fn format_chain(chain: &[Currency]) -> String {
    chain
        .iter()
        .map(Currency::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}
