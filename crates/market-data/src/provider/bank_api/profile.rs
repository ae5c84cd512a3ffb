use crate::models::{Currency, QuoteConvention, RateFrequency, RateSource};

/// Static description of one bank served by the rate API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankProfile {
    /// Path segment identifying the bank, e.g. `EUECB`.
    pub bank_id: &'static str,
    pub source: RateSource,
    pub currency: Currency,
    pub convention: QuoteConvention,
    pub frequencies: &'static [RateFrequency],
}

pub const ECB: BankProfile = BankProfile {
    bank_id: "EUECB",
    source: RateSource::ECB,
    currency: Currency::EUR,
    convention: QuoteConvention::Indirect,
    frequencies: &[RateFrequency::Daily, RateFrequency::Monthly],
};

pub const HMRC: BankProfile = BankProfile {
    bank_id: "GBHMRC",
    source: RateSource::HMRC,
    currency: Currency::GBP,
    convention: QuoteConvention::Indirect,
    frequencies: &[RateFrequency::Monthly],
};

pub const MNB: BankProfile = BankProfile {
    bank_id: "HUCB",
    source: RateSource::MNB,
    currency: Currency::HUF,
    convention: QuoteConvention::Direct,
    frequencies: &[RateFrequency::Daily],
};

pub const MXCB: BankProfile = BankProfile {
    bank_id: "MXCB",
    source: RateSource::MXCB,
    currency: Currency::MXN,
    convention: QuoteConvention::Direct,
    frequencies: &[RateFrequency::Monthly],
};

pub const PLCB: BankProfile = BankProfile {
    bank_id: "PLCB",
    source: RateSource::PLCB,
    currency: Currency::PLN,
    convention: QuoteConvention::Direct,
    frequencies: &[RateFrequency::Daily],
};

pub const SECB: BankProfile = BankProfile {
    bank_id: "SECB",
    source: RateSource::SECB,
    currency: Currency::SEK,
    convention: QuoteConvention::Direct,
    frequencies: &[RateFrequency::Daily],
};

pub const ALL_PROFILES: &[&BankProfile] = &[&ECB, &HMRC, &MNB, &MXCB, &PLCB, &SECB];

impl BankProfile {
    pub fn for_source(source: RateSource) -> &'static BankProfile {
        match source {
            RateSource::ECB => &ECB,
            RateSource::HMRC => &HMRC,
            RateSource::MNB => &MNB,
            RateSource::MXCB => &MXCB,
            RateSource::PLCB => &PLCB,
            RateSource::SECB => &SECB,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_source_has_a_profile() {
        for source in RateSource::ALL {
            assert_eq!(BankProfile::for_source(*source).source, *source);
        }
        assert_eq!(ALL_PROFILES.len(), RateSource::ALL.len());
    }

    #[test]
    fn test_ecb_profile() {
        let profile = BankProfile::for_source(RateSource::ECB);
        assert_eq!(profile.bank_id, "EUECB");
        assert_eq!(profile.currency, Currency::EUR);
        assert_eq!(profile.convention, QuoteConvention::Indirect);
        assert_eq!(
            profile.frequencies,
            &[RateFrequency::Daily, RateFrequency::Monthly]
        );
    }
}
