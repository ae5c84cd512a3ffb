//! Provider capability description.

use crate::models::RateFrequency;

/// Describes which rate series a provider publishes.
///
/// Frequency dispatch is a lookup into `frequencies`; callers never probe
/// the provider's concrete type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderCapabilities {
    /// Frequencies this provider publishes.
    pub frequencies: &'static [RateFrequency],

    /// Whether the provider serves a "latest" window.
    pub supports_latest: bool,

    /// Whether the provider serves arbitrary historical ranges.
    pub supports_historical: bool,
}

impl ProviderCapabilities {
    pub fn supports(&self, frequency: RateFrequency) -> bool {
        self.frequencies.contains(&frequency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supports_is_a_frequency_lookup() {
        let caps = ProviderCapabilities {
            frequencies: &[RateFrequency::Daily, RateFrequency::Monthly],
            supports_latest: true,
            supports_historical: true,
        };
        assert!(caps.supports(RateFrequency::Daily));
        assert!(caps.supports(RateFrequency::Monthly));
        assert!(!caps.supports(RateFrequency::Weekly));
        assert!(!caps.supports(RateFrequency::BiWeekly));
    }
}
