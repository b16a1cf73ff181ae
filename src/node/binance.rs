//! Binance spot and P2P marketplace clients.

use std::time::Duration;

use async_trait::async_trait;
use eyre::Result;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use super::{BoxedNode, ExchangeNode, PricePair};
use crate::currency::Currency;

/// Per-request timeout for Binance endpoints.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Top-of-book spot prices from the public bookTicker endpoint.
#[derive(Clone, Debug)]
pub struct BinanceSpot {
    /// Base currency
    base: Currency,
    /// Quote currency
    quote: Currency,
    /// Current prices
    prices: PricePair,
    /// Shared HTTP client
    client: Client,
}

impl BinanceSpot {
    /// A spot market node for `base`/`quote`.
    #[must_use]
    pub fn new(base: Currency, quote: Currency) -> Self {
        Self {
            base,
            quote,
            prices: PricePair::new(false),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl ExchangeNode for BinanceSpot {
    fn base(&self) -> Currency {
        self.base
    }

    fn quote(&self) -> Currency {
        self.quote
    }

    fn key(&self) -> String {
        format!("BinanceSpot {}/{}", self.base, self.quote)
    }

    fn buy_price(&self) -> f64 {
        self.prices.buy()
    }

    fn sell_price(&self) -> f64 {
        self.prices.sell()
    }

    fn invalid(&self) -> bool {
        self.prices.degenerate()
    }

    async fn refresh(&mut self) -> Result<()> {
        let url = format!(
            "https://api.binance.com/api/v3/ticker/bookTicker?symbol={}{}",
            self.base.code(),
            self.quote.code()
        );
        let data: Value = self
            .client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .json()
            .await?;

        // An unknown symbol answers with an error object instead of a book;
        // sentinels stay in place in that case.
        if let (Some(ask), Some(bid)) = (data["askPrice"].as_str(), data["bidPrice"].as_str()) {
            self.prices.record(ask.parse()?, bid.parse()?);
        }
        Ok(())
    }

    fn clone_node(&self) -> BoxedNode {
        Box::new(self.clone())
    }
}

/// Payment methods recognized by the Binance P2P advert search.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PayMethod {
    /// Tinkoff bank transfer
    Tinkoff,
    /// RosBank transfer
    RosBank,
    /// Raiffeisen Bank Russia transfer
    RaiffeisenBankRussia,
    /// QIWI wallet
    Qiwi,
    /// Post Bank Russia transfer
    PostBankRussia,
    /// Jysan Bank (Kazakhstan)
    JysanBank,
    /// PermataMe (Indonesia)
    PermataMe,
    /// Generic bank transfer
    BankTransfer,
    /// Uzcard (Uzbekistan)
    Uzcard,
    /// Kapitalbank (Uzbekistan)
    Kapitalbank,
    /// Paysend transfer
    Paysend,
}

impl PayMethod {
    /// The identifier the advert search expects.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tinkoff => "Tinkoff",
            Self::RosBank => "RosBank",
            Self::RaiffeisenBankRussia => "RaiffeisenBankRussia",
            Self::Qiwi => "QIWI",
            Self::PostBankRussia => "PostBankRussia",
            Self::JysanBank => "JysanBank",
            Self::PermataMe => "PermataMe",
            Self::BankTransfer => "BANK",
            Self::Uzcard => "Uzcard",
            Self::Kapitalbank => "Kapitalbank",
            Self::Paysend => "Paysend",
        }
    }
}

/// Request body for the P2P advert search endpoint.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AdvertSearch<'a> {
    /// Asset being bought or sold
    asset: &'a str,
    /// Fiat side of the advert
    fiat: &'a str,
    /// Result page, 1-based
    page: u32,
    /// Adverts per page
    rows: u32,
    /// Accepted payment methods; empty means any
    pay_types: Vec<&'static str>,
    /// "merchant" to restrict to verified merchants
    publisher_type: Option<&'a str>,
    /// "BUY" or "SELL", from the taker's perspective
    trade_type: &'a str,
}

/// Best-advert prices from the Binance P2P marketplace, restricted to a set of
/// payment methods.
#[derive(Clone, Debug)]
pub struct BinanceP2p {
    /// Base currency (the asset side)
    base: Currency,
    /// Quote currency (the fiat side)
    quote: Currency,
    /// Payment methods the advert must accept
    pay_methods: Vec<PayMethod>,
    /// Replaces the method list in the key, for grouped method sets
    method_label: Option<String>,
    /// Restrict to verified merchants
    merchant_only: bool,
    /// Current prices
    prices: PricePair,
    /// Shared HTTP client
    client: Client,
}

impl BinanceP2p {
    /// A P2P node for `base`/`quote` filtered to `pay_methods`.
    #[must_use]
    pub fn new(base: Currency, quote: Currency, pay_methods: Vec<PayMethod>) -> Self {
        Self {
            base,
            quote,
            pay_methods,
            method_label: None,
            merchant_only: false,
            prices: PricePair::new(false),
            client: Client::new(),
        }
    }

    /// Label the node with a custom method-set name instead of the raw list.
    #[must_use]
    pub fn with_label(mut self, label: &str) -> Self {
        self.method_label = Some(label.to_owned());
        self
    }

    /// Only accept adverts published by verified merchants.
    #[must_use]
    pub const fn merchant_only(mut self) -> Self {
        self.merchant_only = true;
        self
    }

    /// The name of the payment-method set used in the key.
    fn method_name(&self) -> String {
        self.method_label.clone().unwrap_or_else(|| {
            self.pay_methods
                .iter()
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(",")
        })
    }

    /// Price of the best advert for one trade side, if any advert matches.
    async fn top_advert_price(&self, trade_type: &str) -> Result<Option<f64>> {
        let body = AdvertSearch {
            asset: self.base.code(),
            fiat: self.quote.code(),
            page: 1,
            rows: 3,
            pay_types: self.pay_methods.iter().map(|m| m.as_str()).collect(),
            publisher_type: self.merchant_only.then_some("merchant"),
            trade_type,
        };
        let data: Value = self
            .client
            .post("https://p2p.binance.com/bapi/c2c/v2/friendly/c2c/adv/search")
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        match data["data"][0]["adv"]["price"].as_str() {
            Some(price) => Ok(Some(price.parse()?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ExchangeNode for BinanceP2p {
    fn base(&self) -> Currency {
        self.base
    }

    fn quote(&self) -> Currency {
        self.quote
    }

    fn key(&self) -> String {
        format!(
            "BinanceP2P {} {}/{}",
            self.method_name(),
            self.base,
            self.quote
        )
    }

    fn buy_price(&self) -> f64 {
        self.prices.buy()
    }

    fn sell_price(&self) -> f64 {
        self.prices.sell()
    }

    fn invalid(&self) -> bool {
        self.prices.degenerate()
    }

    async fn refresh(&mut self) -> Result<()> {
        // Two independent advert queries; a side with no matching adverts
        // keeps its sentinel.
        if let Some(price) = self.top_advert_price("BUY").await? {
            self.prices.record_buy(price);
        }
        if let Some(price) = self.top_advert_price("SELL").await? {
            self.prices.record_sell(price);
        }
        Ok(())
    }

    fn clone_node(&self) -> BoxedNode {
        Box::new(self.clone())
    }
}
