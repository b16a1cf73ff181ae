//! Shared constructors for unit tests.

use crate::balance::Balance;
use crate::catalog::NodeCatalog;
use crate::currency::Currency;
use crate::node::fees::FixedRate;
use crate::node::BoxedNode;

/// A fixed-rate node named `name` with both sides priced.
pub fn fixed(name: &str, base: Currency, quote: Currency, buy: f64, sell: f64) -> BoxedNode {
    Box::new(FixedRate::new(base, quote, Some(buy), Some(sell), name))
}

/// A catalog over the given nodes.
pub fn catalog(nodes: Vec<BoxedNode>) -> NodeCatalog {
    let mut catalog = NodeCatalog::new();
    catalog.extend(nodes);
    catalog
}

/// A US dollar balance.
pub fn usd(amount: f64) -> Balance {
    Balance::new(amount, Currency::Usd)
}
