//! Concurrent price refresh over a node catalog.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use rand::seq::SliceRandom;

use crate::catalog::NodeCatalog;
use crate::node::{BoxedNode, ExchangeNode};

/// How often a single node's refresh is attempted within one batch.
///
/// The default is a single attempt: resilience across batches is the caller's
/// business (re-invoke the whole refresh), not this stage's. Venues that
/// rate-limit aggressively can be given a small backoff instead of hand-rolled
/// retry loops inside each client.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Attempts per node, at least 1
    pub attempts: u32,
    /// Pause between attempts
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 1,
            backoff: Duration::ZERO,
        }
    }
}

/// Refreshes every node of a catalog over a bounded pool of concurrent
/// workers and publishes the filtered result.
///
/// The input catalog is never mutated: prices are written to a clone, so the
/// pristine original can be refreshed again later.
#[derive(Clone, Copy, Debug)]
pub struct RateRefresher {
    /// Maximum concurrently in-flight refreshes
    workers: usize,
    /// Drop nodes that still have no real prices afterwards
    filter_invalid: bool,
    /// Per-node attempt policy
    retry: RetryPolicy,
}

impl RateRefresher {
    /// A refresher with `workers` concurrent slots.
    #[must_use]
    pub fn new(workers: usize, filter_invalid: bool) -> Self {
        Self {
            workers,
            filter_invalid,
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the default single-attempt policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Clone the catalog, refresh every node, and return the working copy
    /// with unusable nodes dropped (when filtering is on).
    ///
    /// Dispatch order is shuffled so load spreads across venues instead of
    /// hammering whichever host sorts first. The call blocks until every
    /// node's refresh has completed; one hung venue only occupies one worker
    /// slot and never delays the others.
    pub async fn refresh(&self, catalog: &NodeCatalog) -> NodeCatalog {
        let mut entries = catalog.clone().into_entries();
        entries.shuffle(&mut rand::rng());
        let total = entries.len();

        let retry = self.retry;
        let refreshed: Vec<(String, BoxedNode)> = stream::iter(entries)
            .map(|(key, mut node)| async move {
                refresh_node(node.as_mut(), retry).await;
                (key, node)
            })
            .buffer_unordered(self.workers.max(1))
            .collect()
            .await;

        let mut working = NodeCatalog::from_entries(refreshed);
        if self.filter_invalid {
            working.retain(|_, node| !node.invalid());
            log::info!(
                "refresh: {} of {total} nodes carry usable prices",
                working.len()
            );
        }
        working
    }
}

/// Run one node's refresh under the retry policy, absorbing all failures.
/// After this returns the node either carries real prices or is invalid.
async fn refresh_node(node: &mut dyn ExchangeNode, retry: RetryPolicy) {
    let attempts = retry.attempts.max(1);
    for attempt in 1..=attempts {
        match node.refresh().await {
            Ok(()) if !node.invalid() => return,
            Ok(()) => log::debug!(
                "refresh: {} returned no usable prices (attempt {attempt}/{attempts})",
                node.key()
            ),
            Err(e) => log::debug!(
                "refresh: {} failed: {e} (attempt {attempt}/{attempts})",
                node.key()
            ),
        }
        if attempt < attempts {
            tokio::time::sleep(retry.backoff).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use eyre::{bail, Result};

    use super::*;
    use crate::currency::Currency;
    use crate::node::fees::PercentFee;
    use crate::node::PricePair;
    use crate::test_helpers::*;

    /// A scripted venue: either answers with fixed prices or fails.
    #[derive(Clone)]
    struct ScriptedNode {
        name: String,
        base: Currency,
        quote: Currency,
        outcome: Option<(f64, f64)>,
        prices: PricePair,
    }

    impl ScriptedNode {
        fn new(name: &str, base: Currency, quote: Currency, outcome: Option<(f64, f64)>) -> Self {
            Self {
                name: name.to_owned(),
                base,
                quote,
                outcome,
                prices: PricePair::new(false),
            }
        }
    }

    #[async_trait]
    impl ExchangeNode for ScriptedNode {
        fn base(&self) -> Currency {
            self.base
        }
        fn quote(&self) -> Currency {
            self.quote
        }
        fn key(&self) -> String {
            self.name.clone()
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
            match self.outcome {
                Some((buy, sell)) => {
                    self.prices.record(buy, sell);
                    Ok(())
                }
                None => bail!("venue unreachable"),
            }
        }
        fn clone_node(&self) -> BoxedNode {
            Box::new(self.clone())
        }
    }

    fn scripted_catalog() -> NodeCatalog {
        catalog(vec![
            Box::new(ScriptedNode::new(
                "good",
                Currency::Usd,
                Currency::Eur,
                Some((1.1, 0.9)),
            )),
            Box::new(ScriptedNode::new(
                "down",
                Currency::Eur,
                Currency::Rub,
                None,
            )),
            Box::new(PercentFee::new(Currency::Usd, 2.0, "fee")),
        ])
    }

    #[tokio::test]
    async fn test_filters_failed_nodes_and_keeps_fees() {
        let base = scripted_catalog();
        let live = RateRefresher::new(4, true).refresh(&base).await;

        assert!(live.get("good").is_some());
        // Failure contained to the node itself
        assert!(live.get("down").is_none());
        // Fee-only nodes need no live data and always survive filtering
        assert!(live.get("fee 2%").is_some());
        // Source catalog untouched
        assert!(base.get("good").unwrap().invalid());
    }

    #[tokio::test]
    async fn test_unfiltered_keeps_invalid_nodes() {
        let base = scripted_catalog();
        let live = RateRefresher::new(4, false).refresh(&base).await;
        assert_eq!(live.len(), base.len());
        assert!(live.get("down").unwrap().invalid());
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent_across_clones() {
        let base = scripted_catalog();
        let refresher = RateRefresher::new(2, true);

        let first = refresher.refresh(&base).await;
        let second = refresher.refresh(&base).await;

        let first_keys: Vec<_> = first.keys().map(str::to_owned).collect();
        let second_keys: Vec<_> = second.keys().map(str::to_owned).collect();
        assert_eq!(first_keys, second_keys);
        for key in &first_keys {
            let a = first.get(key).unwrap();
            let b = second.get(key).unwrap();
            assert_eq!(a.buy_price(), b.buy_price());
            assert_eq!(a.sell_price(), b.sell_price());
        }
    }

    #[tokio::test]
    async fn test_single_worker_still_completes() {
        let base = scripted_catalog();
        let live = RateRefresher::new(1, true).refresh(&base).await;
        assert!(live.get("good").is_some());
    }

    #[tokio::test]
    async fn test_retry_policy_extra_attempts() {
        // A permanently failing node stays invalid no matter how many attempts
        let base = catalog(vec![Box::new(ScriptedNode::new(
            "down",
            Currency::Usd,
            Currency::Eur,
            None,
        ))]);
        let refresher = RateRefresher::new(1, true).with_retry(RetryPolicy {
            attempts: 3,
            backoff: Duration::ZERO,
        });
        let live = refresher.refresh(&base).await;
        assert!(live.is_empty());
    }
}
