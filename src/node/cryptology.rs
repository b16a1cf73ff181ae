//! Cryptology order-book client.

use std::time::Duration;

use async_trait::async_trait;
use eyre::Result;
use reqwest::Client;
use serde_json::Value;

use super::{BoxedNode, ExchangeNode, PricePair};
use crate::currency::Currency;

/// Per-request timeout for the order-book endpoint.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A price level's price field, quoted as either a number or a string.
fn level_price(level: &Value) -> Option<f64> {
    level
        .as_f64()
        .or_else(|| level.as_str().and_then(|s| s.parse().ok()))
}

/// Top-of-book prices from the public Cryptology order-book endpoint.
#[derive(Clone, Debug)]
pub struct Cryptology {
    /// Base currency
    base: Currency,
    /// Quote currency
    quote: Currency,
    /// Current prices
    prices: PricePair,
    /// Shared HTTP client
    client: Client,
}

impl Cryptology {
    /// A Cryptology market node for `base`/`quote`.
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
impl ExchangeNode for Cryptology {
    fn base(&self) -> Currency {
        self.base
    }

    fn quote(&self) -> Currency {
        self.quote
    }

    fn key(&self) -> String {
        format!("Cryptology {}/{}", self.base, self.quote)
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
            "https://api.cryptology.com/v1/public/get-order-book?trade_pair={}_{}",
            self.base.code(),
            self.quote.code()
        );
        let body: Value = self
            .client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .json()
            .await?;

        // An unknown pair answers with a null data field; sentinels stay in
        // place in that case. Levels are [price, volume] arrays.
        let data = &body["data"];
        if !data.is_null() {
            if let (Some(ask), Some(bid)) = (
                level_price(&data["asks"][0][0]),
                level_price(&data["bids"][0][0]),
            ) {
                self.prices.record(ask, bid);
            }
        }
        Ok(())
    }

    fn clone_node(&self) -> BoxedNode {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_and_initial_state() {
        let node = Cryptology::new(Currency::Usdt, Currency::Usd);
        assert_eq!(node.key(), "Cryptology USDT/USD");
        assert!(node.invalid());
        assert_eq!(node.buy_price(), f64::INFINITY);
        assert_eq!(node.sell_price(), 0.0);
    }

    #[test]
    fn test_level_price_accepts_both_quotings() {
        assert_eq!(level_price(&serde_json::json!(1.25)), Some(1.25));
        assert_eq!(level_price(&serde_json::json!("1.25")), Some(1.25));
        assert_eq!(level_price(&serde_json::json!(null)), None);
    }
}
