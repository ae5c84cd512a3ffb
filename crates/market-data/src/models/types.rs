use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Failure to parse one of the enumerated codes from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCodeError {
    #[error("{kind} code must not be blank")]
    Empty { kind: &'static str },

    #[error("Unknown {kind} code: {value}")]
    Unknown { kind: &'static str, value: String },
}

/// Institution publishing a rate series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RateSource {
    /// European Central Bank
    ECB,
    /// HM Revenue & Customs
    HMRC,
    /// Magyar Nemzeti Bank
    MNB,
    /// Banco de Mexico
    MXCB,
    /// Narodowy Bank Polski
    PLCB,
    /// Sveriges Riksbank
    SECB,
}

impl RateSource {
    pub const ALL: &'static [RateSource] = &[
        RateSource::ECB,
        RateSource::HMRC,
        RateSource::MNB,
        RateSource::MXCB,
        RateSource::PLCB,
        RateSource::SECB,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RateSource::ECB => "ECB",
            RateSource::HMRC => "HMRC",
            RateSource::MNB => "MNB",
            RateSource::MXCB => "MXCB",
            RateSource::PLCB => "PLCB",
            RateSource::SECB => "SECB",
        }
    }
}

impl fmt::Display for RateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RateSource {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_code(s, "source", RateSource::ALL, RateSource::as_str)
    }
}

/// Publication cadence of a rate series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RateFrequency {
    Daily,
    Weekly,
    BiWeekly,
    Monthly,
}

impl RateFrequency {
    pub const ALL: &'static [RateFrequency] = &[
        RateFrequency::Daily,
        RateFrequency::Weekly,
        RateFrequency::BiWeekly,
        RateFrequency::Monthly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RateFrequency::Daily => "Daily",
            RateFrequency::Weekly => "Weekly",
            RateFrequency::BiWeekly => "BiWeekly",
            RateFrequency::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for RateFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RateFrequency {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_code(s, "frequency", RateFrequency::ALL, RateFrequency::as_str)
    }
}

/// How a stored rate relates to the source's base currency.
///
/// `Direct`: foreign units per one base unit.
/// `Indirect`: base units per one foreign unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuoteConvention {
    Direct,
    Indirect,
}

fn parse_code<T: Copy>(
    s: &str,
    kind: &'static str,
    all: &[T],
    as_str: fn(&T) -> &'static str,
) -> Result<T, ParseCodeError> {
    let code = s.trim();
    if code.is_empty() {
        return Err(ParseCodeError::Empty { kind });
    }
    all.iter()
        .copied()
        .find(|v| as_str(v).eq_ignore_ascii_case(code))
        .ok_or_else(|| ParseCodeError::Unknown {
            kind,
            value: code.to_string(),
        })
}
