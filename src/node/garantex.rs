//! Garantex order-book client.

use std::time::Duration;

use async_trait::async_trait;
use eyre::Result;
use reqwest::Client;
use serde_json::Value;

use super::{BoxedNode, ExchangeNode, PricePair};
use crate::currency::Currency;

/// Per-request timeout for the depth endpoint.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Top-of-book prices from the public Garantex depth endpoint.
#[derive(Clone, Debug)]
pub struct Garantex {
    /// Base currency
    base: Currency,
    /// Quote currency
    quote: Currency,
    /// Current prices
    prices: PricePair,
    /// Shared HTTP client
    client: Client,
}

impl Garantex {
    /// A Garantex market node for `base`/`quote`.
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
impl ExchangeNode for Garantex {
    fn base(&self) -> Currency {
        self.base
    }

    fn quote(&self) -> Currency {
        self.quote
    }

    fn key(&self) -> String {
        format!("Garantex {}/{}", self.base, self.quote)
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
        let market = format!("{}{}", self.base.code(), self.quote.code()).to_lowercase();
        let url = format!("https://garantex.io/api/v2/depth?market={market}");
        let data: Value = self
            .client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .json()
            .await?;

        if data["error"].is_null() {
            if let (Some(ask), Some(bid)) = (
                data["asks"][0]["price"].as_str(),
                data["bids"][0]["price"].as_str(),
            ) {
                self.prices.record(ask.parse()?, bid.parse()?);
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
        let node = Garantex::new(Currency::Usdt, Currency::Rub);
        assert_eq!(node.key(), "Garantex USDT/RUB");
        assert!(node.invalid());
        assert_eq!(node.buy_price(), f64::INFINITY);
        assert_eq!(node.sell_price(), 0.0);
    }
}
