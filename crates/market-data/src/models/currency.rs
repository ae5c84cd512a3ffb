//! Supported currencies.
//!
//! The set is closed: every provider base currency, every currency that takes
//! part in a default peg, and the currencies the central banks commonly quote.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::types::ParseCodeError;

macro_rules! currencies {
    ($($code:ident => $name:literal),+ $(,)?) => {
        /// ISO 4217 currency code.
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub enum Currency {
            $(
                #[doc = $name]
                $code,
            )+
        }

        impl Currency {
            /// Every supported currency, in declaration order.
            pub const ALL: &'static [Currency] = &[$(Currency::$code),+];

            /// Upper-case ISO code, e.g. `"EUR"`.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Currency::$code => stringify!($code),)+
                }
            }

            /// English display name.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Currency::$code => $name,)+
                }
            }
        }
    };
}

currencies! {
    AED => "UAE Dirham",
    ANG => "Netherlands Antillean Guilder",
    ARS => "Argentine Peso",
    AUD => "Australian Dollar",
    AWG => "Aruban Florin",
    BAM => "Bosnia-Herzegovina Convertible Mark",
    BBD => "Barbadian Dollar",
    BGN => "Bulgarian Lev",
    BHD => "Bahraini Dinar",
    BND => "Brunei Dollar",
    BRL => "Brazilian Real",
    BSD => "Bahamian Dollar",
    BZD => "Belize Dollar",
    CAD => "Canadian Dollar",
    CHF => "Swiss Franc",
    CLP => "Chilean Peso",
    CNY => "Chinese Yuan",
    COP => "Colombian Peso",
    CVE => "Cape Verdean Escudo",
    CZK => "Czech Koruna",
    DJF => "Djiboutian Franc",
    DKK => "Danish Krone",
    EGP => "Egyptian Pound",
    ERN => "Eritrean Nakfa",
    EUR => "Euro",
    GBP => "British Pound",
    HKD => "Hong Kong Dollar",
    HUF => "Hungarian Forint",
    IDR => "Indonesian Rupiah",
    ILS => "Israeli New Shekel",
    INR => "Indian Rupee",
    ISK => "Icelandic Krona",
    JOD => "Jordanian Dinar",
    JPY => "Japanese Yen",
    KES => "Kenyan Shilling",
    KMF => "Comorian Franc",
    KRW => "South Korean Won",
    KWD => "Kuwaiti Dinar",
    MAD => "Moroccan Dirham",
    MOP => "Macanese Pataca",
    MXN => "Mexican Peso",
    MYR => "Malaysian Ringgit",
    NGN => "Nigerian Naira",
    NOK => "Norwegian Krone",
    NZD => "New Zealand Dollar",
    OMR => "Omani Rial",
    PAB => "Panamanian Balboa",
    PEN => "Peruvian Sol",
    PHP => "Philippine Peso",
    PKR => "Pakistani Rupee",
    PLN => "Polish Zloty",
    QAR => "Qatari Riyal",
    RON => "Romanian Leu",
    RSD => "Serbian Dinar",
    SAR => "Saudi Riyal",
    SEK => "Swedish Krona",
    SGD => "Singapore Dollar",
    THB => "Thai Baht",
    TMT => "Turkmenistan Manat",
    TRY => "Turkish Lira",
    TWD => "New Taiwan Dollar",
    UAH => "Ukrainian Hryvnia",
    USD => "US Dollar",
    UYU => "Uruguayan Peso",
    VND => "Vietnamese Dong",
    XAF => "Central African CFA Franc",
    XCD => "East Caribbean Dollar",
    XOF => "West African CFA Franc",
    XPF => "CFP Franc",
    ZAR => "South African Rand",
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = ParseCodeError;

    /// Case-insensitive parse of an ISO code. Surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.is_empty() {
            return Err(ParseCodeError::Empty { kind: "currency" });
        }
        Currency::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(code))
            .ok_or_else(|| ParseCodeError::Unknown {
                kind: "currency",
                value: code.to_string(),
            })
    }
}
