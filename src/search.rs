//! Cycle enumeration over the conversion graph.
//!
//! The walk treats the catalog as a node pool rather than an adjacency list:
//! at every position any node convertible from the current currency may be
//! placed, including one already used earlier in the path. Enumeration order
//! is fixed by the catalog's key order, so two runs over the same catalog
//! produce identical sequences.

use crate::catalog::NodeCatalog;
use crate::currency::Currency;
use crate::route::{NodeRef, Route};

/// One suspended level of the depth-first walk.
struct Frame {
    /// Index of the next pool node to try at this level
    next: usize,
    /// Currency held entering this level
    currency: Currency,
}

/// Depth-first walk over node chains starting from a target currency.
///
/// Yields every chain of exactly `size` nodes that arrives back at the target,
/// and additionally every interior prefix once its subtree is exhausted. The
/// prefixes are not cycles; consumers that want closed loops only must
/// re-check each emission with [`Route::evaluate_loop`], which is what
/// [`CycleSearch`] does.
pub struct TreeWalk<'a> {
    /// Node pool in catalog key order
    nodes: Vec<NodeRef<'a>>,
    /// Currency every emitted full-length chain must return to
    target: Currency,
    /// Exact chain length searched for
    size: usize,
    /// Suspended levels, one per path element plus the active one
    stack: Vec<Frame>,
    /// Indices into the pool for the current partial chain
    path: Vec<usize>,
}

impl<'a> TreeWalk<'a> {
    /// A walk over `catalog` searching for chains of `size` nodes closing at
    /// `target`. A zero size yields nothing.
    #[must_use]
    pub fn new(catalog: &'a NodeCatalog, target: Currency, size: usize) -> Self {
        let stack = if size == 0 {
            Vec::new()
        } else {
            vec![Frame {
                next: 0,
                currency: target,
            }]
        };
        Self {
            nodes: catalog.nodes().collect(),
            target,
            size,
            stack,
            path: Vec::new(),
        }
    }

    /// Materialize a chain of pool indices into node references.
    fn resolve(&self, indices: &[usize]) -> Vec<NodeRef<'a>> {
        indices.iter().map(|&i| self.nodes[i]).collect()
    }
}

impl<'a> Iterator for TreeWalk<'a> {
    type Item = Vec<NodeRef<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;

            if frame.next >= self.nodes.len() {
                // Level exhausted: emit the prefix standing above it, after
                // everything found beneath it.
                self.stack.pop();
                if self.path.is_empty() {
                    return None;
                }
                let prefix = self.resolve(&self.path);
                self.path.pop();
                return Some(prefix);
            }

            let idx = frame.next;
            frame.next += 1;
            let Some(next_currency) = self.nodes[idx].currency_convert(frame.currency) else {
                continue;
            };

            if self.path.len() + 1 < self.size {
                self.path.push(idx);
                self.stack.push(Frame {
                    next: 0,
                    currency: next_currency,
                });
            } else if next_currency == self.target {
                let mut chain = self.path.clone();
                chain.push(idx);
                return Some(self.resolve(&chain));
            }
        }
    }
}

/// Closed conversion loops of a fixed length through a catalog.
///
/// Wraps [`TreeWalk`] and keeps only emissions that
/// [`Route::evaluate_loop`] confirms as loops of exactly the requested
/// length, discarding the walk's interior prefixes.
pub struct CycleSearch<'a> {
    /// The underlying walk
    walk: TreeWalk<'a>,
    /// Currency the loop must start and end in
    target: Currency,
    /// Exact loop length
    size: usize,
}

impl<'a> CycleSearch<'a> {
    /// All `size`-node loops through `catalog` closing at `target`.
    #[must_use]
    pub fn new(catalog: &'a NodeCatalog, target: Currency, size: usize) -> Self {
        Self {
            walk: TreeWalk::new(catalog, target, size),
            target,
            size,
        }
    }
}

impl<'a> Iterator for CycleSearch<'a> {
    type Item = Route<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for nodes in self.walk.by_ref() {
            let route = Route::new(nodes);
            if route.evaluate_loop(self.target, Some(self.size)) {
                return Some(route);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn keys(route: &Route<'_>) -> Vec<String> {
        route.nodes().iter().map(|n| n.key()).collect()
    }

    fn two_node_catalog() -> NodeCatalog {
        catalog(vec![
            fixed("A", Currency::Usd, Currency::Eur, 1.0, 1.0),
            fixed("B", Currency::Eur, Currency::Usd, 1.0, 1.0),
        ])
    }

    #[test]
    fn test_pair_cycles_enumerated_in_key_order() {
        let pool = two_node_catalog();
        let routes: Vec<_> = CycleSearch::new(&pool, Currency::Usd, 2)
            .map(|r| keys(&r))
            .collect();
        // A node may occupy several positions of one loop
        assert_eq!(
            routes,
            vec![
                vec!["A USD/EUR", "A USD/EUR"],
                vec!["A USD/EUR", "B EUR/USD"],
                vec!["B EUR/USD", "A USD/EUR"],
                vec!["B EUR/USD", "B EUR/USD"],
            ]
        );
    }

    #[test]
    fn test_walk_emits_interior_prefixes() {
        let pool = two_node_catalog();
        let emissions: Vec<usize> = TreeWalk::new(&pool, Currency::Usd, 2)
            .map(|chain| chain.len())
            .collect();
        // Four closed pairs plus one standalone prefix per first-level node
        assert_eq!(emissions, vec![2, 2, 1, 2, 2, 1]);
    }

    #[test]
    fn test_prefixes_are_filtered_from_cycles() {
        let pool = two_node_catalog();
        assert!(CycleSearch::new(&pool, Currency::Usd, 2).all(|r| r.len() == 2));
    }

    #[test]
    fn test_unreachable_target_yields_nothing() {
        let pool = two_node_catalog();
        let found = CycleSearch::new(&pool, Currency::Rub, 2).count();
        assert_eq!(found, 0);
    }

    #[test]
    fn test_zero_size_yields_nothing() {
        let pool = two_node_catalog();
        assert_eq!(TreeWalk::new(&pool, Currency::Usd, 0).count(), 0);
        assert_eq!(CycleSearch::new(&pool, Currency::Usd, 0).count(), 0);
    }

    #[test]
    fn test_three_hop_loop() {
        let pool = catalog(vec![
            fixed("A", Currency::Usd, Currency::Eur, 1.0, 1.0),
            fixed("B", Currency::Eur, Currency::Rub, 1.0, 1.0),
            fixed("C", Currency::Rub, Currency::Usd, 1.0, 1.0),
        ]);
        let routes: Vec<_> = CycleSearch::new(&pool, Currency::Usd, 3)
            .map(|r| keys(&r))
            .collect();
        assert!(routes.contains(&vec![
            "A USD/EUR".to_owned(),
            "B EUR/RUB".to_owned(),
            "C RUB/USD".to_owned(),
        ]));
        // Every emission really closes at USD in three hops
        for route in CycleSearch::new(&pool, Currency::Usd, 3) {
            assert!(route.evaluate_loop(Currency::Usd, Some(3)));
        }
    }

    #[test]
    fn test_enumeration_is_deterministic() {
        let pool = NodeCatalog::assemble(false);
        let first: Vec<_> = CycleSearch::new(&pool, Currency::Rub, 2)
            .map(|r| keys(&r))
            .collect();
        let second: Vec<_> = CycleSearch::new(&pool, Currency::Rub, 2)
            .map(|r| keys(&r))
            .collect();
        assert_eq!(first, second);
    }
}
