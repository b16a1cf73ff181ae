//! Nodes that need no live data: fixed conversion rates and fee hops.

use async_trait::async_trait;
use eyre::{ensure, Result};

use super::{BoxedNode, ExchangeNode, PricePair};
use crate::balance::Balance;
use crate::currency::Currency;

/// A market with static prices, used for bridges whose rate is known up front
/// (for example moving a venue-internal balance onto a card at a fixed haircut).
#[derive(Clone, Debug)]
pub struct FixedRate {
    /// Base currency
    base: Currency,
    /// Quote currency
    quote: Currency,
    /// Display name prefix
    name: String,
    /// The static prices; an unset side keeps its sentinel
    prices: PricePair,
}

impl FixedRate {
    /// A fixed-rate node. A `None` price leaves that side at its sentinel, so
    /// a node with only a sell price can only be crossed base-to-quote.
    #[must_use]
    pub fn new(
        base: Currency,
        quote: Currency,
        buy: Option<f64>,
        sell: Option<f64>,
        name: &str,
    ) -> Self {
        Self {
            base,
            quote,
            name: name.to_owned(),
            prices: PricePair::with_rates(buy, sell),
        }
    }
}

#[async_trait]
impl ExchangeNode for FixedRate {
    fn base(&self) -> Currency {
        self.base
    }

    fn quote(&self) -> Currency {
        self.quote
    }

    fn key(&self) -> String {
        format!("{} {}/{}", self.name, self.base, self.quote)
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
        Ok(())
    }

    fn clone_node(&self) -> BoxedNode {
        Box::new(self.clone())
    }
}

/// A hop that keeps the currency and charges a percentage of the amount.
#[derive(Clone, Debug)]
pub struct PercentFee {
    /// The currency the fee applies to
    currency: Currency,
    /// Fee in percent of the amount
    fee_pct: f64,
    /// Display name prefix
    name: String,
}

impl PercentFee {
    /// A percentage-fee hop on `currency`.
    #[must_use]
    pub fn new(currency: Currency, fee_pct: f64, name: &str) -> Self {
        Self {
            currency,
            fee_pct,
            name: name.to_owned(),
        }
    }
}

#[async_trait]
impl ExchangeNode for PercentFee {
    fn base(&self) -> Currency {
        self.currency
    }

    fn quote(&self) -> Currency {
        self.currency
    }

    fn key(&self) -> String {
        format!("{} {}%", self.name, self.fee_pct)
    }

    fn buy_price(&self) -> f64 {
        PricePair::SENTINEL_BUY
    }

    fn sell_price(&self) -> f64 {
        PricePair::SENTINEL_SELL
    }

    fn invalid(&self) -> bool {
        false
    }

    async fn refresh(&mut self) -> Result<()> {
        Ok(())
    }

    fn clone_node(&self) -> BoxedNode {
        Box::new(self.clone())
    }

    fn exchange(&self, balance: &Balance) -> Result<Balance> {
        ensure!(
            balance.currency == self.currency,
            "currency mismatch: {} is not traded by {}",
            balance.currency,
            self.key()
        );
        Ok(Balance::new(
            balance.amount * (100.0 - self.fee_pct) / 100.0,
            balance.currency,
        ))
    }
}

/// A hop that keeps the currency and subtracts a flat amount.
#[derive(Clone, Debug)]
pub struct FlatFee {
    /// The currency the fee applies to
    currency: Currency,
    /// Fee subtracted from the amount
    fee_amount: f64,
    /// Display name prefix
    name: String,
}

impl FlatFee {
    /// A flat-fee hop of `fee_amount` units of `currency`.
    #[must_use]
    pub fn new(currency: Currency, fee_amount: f64, name: &str) -> Self {
        Self {
            currency,
            fee_amount,
            name: name.to_owned(),
        }
    }
}

#[async_trait]
impl ExchangeNode for FlatFee {
    fn base(&self) -> Currency {
        self.currency
    }

    fn quote(&self) -> Currency {
        self.currency
    }

    fn key(&self) -> String {
        format!("{} {} {}", self.name, self.fee_amount, self.currency)
    }

    fn buy_price(&self) -> f64 {
        PricePair::SENTINEL_BUY
    }

    fn sell_price(&self) -> f64 {
        PricePair::SENTINEL_SELL
    }

    fn invalid(&self) -> bool {
        false
    }

    async fn refresh(&mut self) -> Result<()> {
        Ok(())
    }

    fn clone_node(&self) -> BoxedNode {
        Box::new(self.clone())
    }

    fn exchange(&self, balance: &Balance) -> Result<Balance> {
        ensure!(
            balance.currency == self.currency,
            "currency mismatch: {} is not traded by {}",
            balance.currency,
            self.key()
        );
        Ok(Balance::new(
            balance.amount - self.fee_amount,
            balance.currency,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_fee() {
        let node = PercentFee::new(Currency::Usd, 2.0, "WireOut");
        let out = node.exchange(&Balance::new(100.0, Currency::Usd)).unwrap();
        assert_eq!(out, Balance::new(98.0, Currency::Usd));
        // Needs no live data
        assert!(!node.invalid());
    }

    #[test]
    fn test_percent_fee_wrong_currency() {
        let node = PercentFee::new(Currency::Usd, 2.0, "WireOut");
        assert!(node.exchange(&Balance::new(100.0, Currency::Eur)).is_err());
    }

    #[test]
    fn test_flat_fee() {
        let node = FlatFee::new(Currency::Eur, 5.0, "SepaOut");
        let out = node.exchange(&Balance::new(100.0, Currency::Eur)).unwrap();
        assert_eq!(out, Balance::new(95.0, Currency::Eur));
        assert!(!node.invalid());
    }

    #[test]
    fn test_fee_nodes_are_identity_hops() {
        let node = PercentFee::new(Currency::Usd, 2.0, "WireOut");
        assert_eq!(node.currency_convert(Currency::Usd), Some(Currency::Usd));
        assert_eq!(node.currency_convert(Currency::Eur), None);
    }

    #[tokio::test]
    async fn test_fee_nodes_survive_refresh() {
        let mut node = FlatFee::new(Currency::Eur, 5.0, "SepaOut");
        node.refresh().await.unwrap();
        assert!(!node.invalid());
    }

    #[test]
    fn test_fixed_rate_validity() {
        let full = FixedRate::new(Currency::VexelEur, Currency::Eur, Some(1.0), Some(1.0), "Sepa");
        assert!(!full.invalid());

        // Sell-only bridge is crossable base-to-quote and still valid
        let one_way =
            FixedRate::new(Currency::VexelRub, Currency::Rub, None, Some(0.98), "Card");
        assert!(!one_way.invalid());
        let out = one_way
            .exchange(&Balance::new(1000.0, Currency::VexelRub))
            .unwrap();
        assert_eq!(out, Balance::new(980.0, Currency::Rub));

        // Never refreshed, no rates at all
        let empty = FixedRate::new(Currency::Usd, Currency::Eur, None, None, "Empty");
        assert!(empty.invalid());
    }
}
