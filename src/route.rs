//! An ordered chain of nodes and the balance flow through it.

use std::fmt::{self, Debug};

use eyre::{Result, WrapErr};

use crate::balance::Balance;
use crate::currency::Currency;
use crate::node::ExchangeNode;

/// A shared, read-only reference to a catalog node.
pub type NodeRef<'a> = &'a dyn ExchangeNode;

/// An ordered sequence of nodes borrowed from a catalog.
///
/// A route is not intrinsically a cycle; only [`Route::evaluate_loop`]
/// establishes that, and any route received from a generator must be re-checked
/// with it before its closure is trusted.
#[derive(Clone)]
pub struct Route<'a> {
    /// The chain, first conversion first
    nodes: Vec<NodeRef<'a>>,
}

impl<'a> Route<'a> {
    /// A route over `nodes` in order.
    #[must_use]
    pub fn new(nodes: Vec<NodeRef<'a>>) -> Self {
        Self { nodes }
    }

    /// Number of conversion hops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the route has no hops.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The chain itself.
    #[must_use]
    pub fn nodes(&self) -> &[NodeRef<'a>] {
        &self.nodes
    }

    /// Whether the route is a closed loop with respect to `target`.
    ///
    /// Walks the chain left to right, advancing the currency through each
    /// node; fails closed the moment a node has no relation to the current
    /// currency, and succeeds only when the final currency equals `target`
    /// again. When `exact_len` is given, a route of any other length is
    /// rejected outright.
    #[must_use]
    pub fn evaluate_loop(&self, target: Currency, exact_len: Option<usize>) -> bool {
        if exact_len.is_some_and(|len| self.nodes.len() != len) {
            return false;
        }
        if self.nodes.is_empty() {
            return false;
        }

        let mut currency = target;
        for node in &self.nodes {
            match node.currency_convert(currency) {
                Some(next) => currency = next,
                None => return false,
            }
        }
        currency == target
    }

    /// Thread a starting balance through every node in order.
    ///
    /// Returns every intermediate balance including the starting one, so the
    /// result is one longer than the route.
    ///
    /// # Errors
    ///
    /// A conversion failure here means the route was never validated with
    /// [`Route::evaluate_loop`] or a degenerate price slipped past filtering;
    /// either way it is an invariant violation the caller must treat as
    /// fatal, not a condition to recover from.
    pub fn forward(&self, start: &Balance) -> Result<Vec<Balance>> {
        let mut balances = Vec::with_capacity(self.nodes.len() + 1);
        balances.push(*start);

        let mut current = *start;
        for node in &self.nodes {
            current = node
                .exchange(&current)
                .wrap_err_with(|| format!("conversion chain broke at {}", node.key()))?;
            balances.push(current);
        }
        Ok(balances)
    }
}

impl Debug for Route<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Route({})",
            self.nodes
                .iter()
                .map(|n| n.key())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn test_evaluate_loop_closed_pair() {
        let a = fixed("A", Currency::Usd, Currency::Eur, 1.0, 1.0);
        let b = fixed("B", Currency::Eur, Currency::Usd, 1.0, 1.0);
        let route = Route::new(vec![a.as_ref(), b.as_ref()]);

        assert!(route.evaluate_loop(Currency::Usd, None));
        assert!(route.evaluate_loop(Currency::Usd, Some(2)));
        assert!(route.evaluate_loop(Currency::Eur, None));
        // Exact-length mismatch rejects outright
        assert!(!route.evaluate_loop(Currency::Usd, Some(3)));
        // Unrelated target fails closed at the first node
        assert!(!route.evaluate_loop(Currency::Rub, None));
    }

    #[test]
    fn test_evaluate_loop_open_chain() {
        let a = fixed("A", Currency::Usd, Currency::Eur, 1.0, 1.0);
        let b = fixed("B", Currency::Eur, Currency::Rub, 1.0, 1.0);
        let route = Route::new(vec![a.as_ref(), b.as_ref()]);
        // Ends in RUB, not back at USD
        assert!(!route.evaluate_loop(Currency::Usd, None));
    }

    #[test]
    fn test_evaluate_loop_empty_route() {
        let route = Route::new(Vec::new());
        assert!(!route.evaluate_loop(Currency::Usd, None));
    }

    #[test]
    fn test_forward_threads_balances() {
        // USD -> EUR at 0.9, EUR -> USD at 1.2
        let a = fixed("A", Currency::Usd, Currency::Eur, 1.0, 0.9);
        let b = fixed("B", Currency::Eur, Currency::Usd, 1.0, 1.2);
        let route = Route::new(vec![a.as_ref(), b.as_ref()]);
        assert!(route.evaluate_loop(Currency::Usd, Some(2)));

        let balances = route.forward(&usd(100.0)).unwrap();
        assert_eq!(balances.len(), route.len() + 1);
        assert_eq!(balances[0], usd(100.0));
        assert_eq!(balances[1], Balance::new(90.0, Currency::Eur));
        assert!((balances[2].amount - 108.0).abs() < 1e-9);
        assert_eq!(balances[2].currency, Currency::Usd);
    }

    #[test]
    fn test_forward_fails_on_unrelated_start() {
        let a = fixed("A", Currency::Usd, Currency::Eur, 1.0, 1.0);
        let route = Route::new(vec![a.as_ref()]);
        let err = route
            .forward(&Balance::new(1.0, Currency::Rub))
            .err()
            .unwrap();
        assert!(err.to_string().contains("conversion chain broke at A"));
    }

    #[test]
    fn test_validated_route_never_fails_forward() {
        let a = fixed("A", Currency::Usd, Currency::Eur, 0.9, 1.1);
        let b = fixed("B", Currency::Eur, Currency::Usd, 1.1, 0.9);
        let route = Route::new(vec![a.as_ref(), b.as_ref()]);
        assert!(route.evaluate_loop(Currency::Usd, None));
        assert!(route.forward(&usd(50.0)).is_ok());
    }
}
