//! Currency identifiers used across the conversion graph.
//!
//! Currencies are compared by identity only. A venue-scoped balance (say, RUB
//! held inside Binance) is deliberately a different currency from the bank
//! fiat of the same name, so a route must pass through an explicit bridge node
//! to move between them.

use std::fmt;
use std::str::FromStr;

use eyre::{bail, Report};

/// Broad grouping of currencies. Only catalog construction cares about this;
/// core search and simulation treat every currency the same.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Family {
    /// Bank fiat money
    Fiat,
    /// Fiat-pegged stablecoins
    Stablecoin,
    /// Volatile crypto instruments
    Crypto,
    /// Fiat balances held inside a specific venue
    VenueFiat,
}

/// A single opaque currency identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub enum Currency {
    /// US dollar
    Usd,
    /// Euro
    Eur,
    /// British pound
    Gbp,
    /// Russian ruble
    Rub,
    /// Kazakhstani tenge
    Kzt,
    /// Indonesian rupiah
    Idr,
    /// Uzbekistani som
    Uzs,
    /// Tether
    Usdt,
    /// Binance USD
    Busd,
    /// USD Coin
    Usdc,
    /// Dai
    Dai,
    /// BIDR (IDR-pegged)
    Bidr,
    /// Bitcoin
    Btc,
    /// Ether
    Eth,
    /// Litecoin
    Ltc,
    /// Bitcoin Cash
    Bch,
    /// BNB
    Bnb,
    /// Shiba Inu
    Shib,
    /// Dogecoin
    Doge,
    /// Ruble fiat balance held on Binance
    BinanceRub,
    /// Ruble balance held on Vexel
    VexelRub,
    /// Dollar balance held on Vexel
    VexelUsd,
    /// Euro balance held on Vexel
    VexelEur,
}

impl Currency {
    /// The family this currency belongs to.
    #[must_use]
    pub const fn family(self) -> Family {
        match self {
            Self::Usd
            | Self::Eur
            | Self::Gbp
            | Self::Rub
            | Self::Kzt
            | Self::Idr
            | Self::Uzs => Family::Fiat,
            Self::Usdt | Self::Busd | Self::Usdc | Self::Dai | Self::Bidr => Family::Stablecoin,
            Self::Btc
            | Self::Eth
            | Self::Ltc
            | Self::Bch
            | Self::Bnb
            | Self::Shib
            | Self::Doge => Family::Crypto,
            Self::BinanceRub | Self::VexelRub | Self::VexelUsd | Self::VexelEur => {
                Family::VenueFiat
            }
        }
    }

    /// The plain ticker a venue API expects on the wire. Venue-scoped fiat
    /// shares the ticker of its bank counterpart.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Usd | Self::VexelUsd => "USD",
            Self::Eur | Self::VexelEur => "EUR",
            Self::Gbp => "GBP",
            Self::Rub | Self::BinanceRub | Self::VexelRub => "RUB",
            Self::Kzt => "KZT",
            Self::Idr => "IDR",
            Self::Uzs => "UZS",
            Self::Usdt => "USDT",
            Self::Busd => "BUSD",
            Self::Usdc => "USDC",
            Self::Dai => "DAI",
            Self::Bidr => "BIDR",
            Self::Btc => "BTC",
            Self::Eth => "ETH",
            Self::Ltc => "LTC",
            Self::Bch => "BCH",
            Self::Bnb => "BNB",
            Self::Shib => "SHIB",
            Self::Doge => "DOGE",
        }
    }

    /// Whether this is a volatile crypto instrument gated by the crypto switch.
    #[must_use]
    pub const fn is_volatile(self) -> bool {
        matches!(self.family(), Family::Crypto)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BinanceRub => write!(f, "Binance:RUB"),
            Self::VexelRub => write!(f, "Vexel:RUB"),
            Self::VexelUsd => write!(f, "Vexel:USD"),
            Self::VexelEur => write!(f, "Vexel:EUR"),
            other => write!(f, "{}", other.code()),
        }
    }
}

impl FromStr for Currency {
    type Err = Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let currency = match s.to_ascii_uppercase().as_str() {
            "USD" => Self::Usd,
            "EUR" => Self::Eur,
            "GBP" => Self::Gbp,
            "RUB" => Self::Rub,
            "KZT" => Self::Kzt,
            "IDR" => Self::Idr,
            "UZS" => Self::Uzs,
            "USDT" => Self::Usdt,
            "BUSD" => Self::Busd,
            "USDC" => Self::Usdc,
            "DAI" => Self::Dai,
            "BIDR" => Self::Bidr,
            "BTC" => Self::Btc,
            "ETH" => Self::Eth,
            "LTC" => Self::Ltc,
            "BCH" => Self::Bch,
            "BNB" => Self::Bnb,
            "SHIB" => Self::Shib,
            "DOGE" => Self::Doge,
            "BINANCE:RUB" => Self::BinanceRub,
            "VEXEL:RUB" => Self::VexelRub,
            "VEXEL:USD" => Self::VexelUsd,
            "VEXEL:EUR" => Self::VexelEur,
            other => bail!("unknown currency code: {other}"),
        };
        Ok(currency)
    }
}
