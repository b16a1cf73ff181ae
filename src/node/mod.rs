//! The exchange-node capability and its concrete venue implementations.
//!
//! Every convertible market between two currencies enters the system through
//! the [`ExchangeNode`] trait, whether it is backed by a live HTTP feed or a
//! fixed rate. The core stages (refresh, search, simulation) only ever see
//! trait objects.

/// Binance spot and P2P clients
pub mod binance;
/// Cryptology order-book client
pub mod cryptology;
/// Fixed-rate and fee-only utility nodes
pub mod fees;
/// Garantex order-book client
pub mod garantex;
/// Buy/sell price state shared by venue nodes
mod prices;

use async_trait::async_trait;
use eyre::{bail, ensure, Result};

pub use prices::PricePair;

use crate::balance::Balance;
use crate::currency::Currency;

/// A boxed, heap-allocated exchange node.
pub type BoxedNode = Box<dyn ExchangeNode>;

/// One convertible market between exactly two currencies.
///
/// `base` and `quote` are fixed for the node's lifetime; prices are written
/// exactly once, during refresh, and read-only afterwards.
#[async_trait]
pub trait ExchangeNode: Send + Sync {
    /// The base currency of the market.
    fn base(&self) -> Currency;

    /// The quote currency of the market.
    fn quote(&self) -> Currency;

    /// Unique catalog key, also used as the display string in reports.
    fn key(&self) -> String;

    /// Cost, in quote, to acquire one unit of base. Already adjusted for
    /// trader mode.
    fn buy_price(&self) -> f64;

    /// Quote received per unit of base sold. Already adjusted for trader mode.
    fn sell_price(&self) -> f64;

    /// True while the node never obtained real prices and must not be routed
    /// through. Fee-only nodes are never invalid.
    fn invalid(&self) -> bool;

    /// Attempt once to populate real prices from the venue.
    ///
    /// A node that could not obtain data leaves its sentinels in place; that,
    /// not the returned error, is the failure signal the pipeline acts on.
    ///
    /// # Errors
    ///
    /// Transport or decoding failures are reported as `Err` so the refresh
    /// stage can log them; they are absorbed there and never propagate.
    async fn refresh(&mut self) -> Result<()>;

    /// Clone this node behind a fresh box.
    fn clone_node(&self) -> BoxedNode;

    /// The opposite side of the market, or `None` when `currency` is not
    /// traded here.
    fn currency_convert(&self, currency: Currency) -> Option<Currency> {
        if currency == self.quote() {
            Some(self.base())
        } else if currency == self.base() {
            Some(self.quote())
        } else {
            None
        }
    }

    /// Convert a balance through this market.
    ///
    /// Base-side balances sell at `sell_price`; quote-side balances acquire
    /// base at `buy_price`.
    ///
    /// # Errors
    ///
    /// Fails with a currency mismatch when the balance is in neither market
    /// currency, and with a degenerate-price error when the conversion would
    /// divide by a zero or sentinel buy price. The latter should be
    /// unreachable once invalid nodes are filtered out.
    fn exchange(&self, balance: &Balance) -> Result<Balance> {
        if balance.currency == self.base() {
            Ok(Balance::new(
                balance.amount * self.sell_price(),
                self.quote(),
            ))
        } else if balance.currency == self.quote() {
            let buy = self.buy_price();
            ensure!(
                buy != 0.0 && buy.is_finite(),
                "degenerate buy price {buy} on {}",
                self.key()
            );
            Ok(Balance::new(balance.amount / buy, self.base()))
        } else {
            bail!(
                "currency mismatch: {} is not traded by {}",
                balance.currency,
                self.key()
            )
        }
    }
}

impl Clone for BoxedNode {
    fn clone(&self) -> Self {
        self.clone_node()
    }
}
