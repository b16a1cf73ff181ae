//! Yield simulation and ranking of candidate loops.

use std::fmt::Write as _;

use eyre::Result;

use crate::balance::Balance;
use crate::route::Route;

/// Outcome of pushing the starting balance once around a loop.
pub struct LoopYield<'a> {
    /// The loop itself
    route: Route<'a>,
    /// Every balance along the way, starting one included
    balances: Vec<Balance>,
    /// Final balance minus starting balance
    profit: Balance,
    /// Profit as a percentage of the start
    perc: f64,
}

impl LoopYield<'_> {
    /// Final balance minus starting balance.
    #[must_use]
    pub const fn profit(&self) -> Balance {
        self.profit
    }

    /// Profit as a percentage of the start.
    #[must_use]
    pub const fn perc(&self) -> f64 {
        self.perc
    }

    /// One line per hop: the balance entering, the balance leaving, and the
    /// node that did the conversion.
    #[must_use]
    pub fn report(&self) -> String {
        let mut out = String::new();
        for (i, node) in self.route.nodes().iter().enumerate() {
            let _ = writeln!(
                out,
                "{} >>> {}, {}",
                self.balances[i],
                self.balances[i + 1],
                node.key()
            );
        }
        out
    }
}

/// Simulates candidate loops with a fixed starting balance and ranks them by
/// profit.
#[derive(Clone, Copy, Debug)]
pub struct Analyzer {
    /// Balance every simulation starts from
    start: Balance,
}

impl Analyzer {
    /// An analyzer starting every loop from `start`.
    #[must_use]
    pub const fn new(start: Balance) -> Self {
        Self { start }
    }

    /// Push the starting balance around one loop.
    ///
    /// # Errors
    ///
    /// Fails when the route does not actually accept the starting currency or
    /// contains a degenerate price; both mean the route was handed over
    /// without validation.
    pub fn analyze<'a>(&self, route: Route<'a>) -> Result<LoopYield<'a>> {
        let balances = route.forward(&self.start)?;
        // Loop closure guarantees the final currency matches the start
        let last = balances[balances.len() - 1];
        let profit = last.try_sub(&self.start)?;
        let perc = (last.ratio(&self.start)? - 1.0) * 100.0;
        Ok(LoopYield {
            route,
            balances,
            profit,
            perc,
        })
    }

    /// Simulate every loop and return the results ordered by percent yield,
    /// worst first. The sort is stable, so equally profitable loops keep
    /// their enumeration order.
    ///
    /// # Errors
    ///
    /// Propagates the first simulation failure; see [`Analyzer::analyze`].
    pub fn simulate<'a>(
        &self,
        routes: impl IntoIterator<Item = Route<'a>>,
    ) -> Result<Vec<LoopYield<'a>>> {
        let mut yields = routes
            .into_iter()
            .map(|route| self.analyze(route))
            .collect::<Result<Vec<_>>>()?;
        yields.sort_by(|a, b| a.perc.total_cmp(&b.perc));
        Ok(yields)
    }

    /// Simulate, rank, and print every profitable loop to stdout, most
    /// profitable last.
    ///
    /// # Errors
    ///
    /// Propagates simulation failures; see [`Analyzer::analyze`].
    pub fn run<'a>(&self, routes: impl IntoIterator<Item = Route<'a>>) -> Result<()> {
        for found in self.simulate(routes)? {
            if found.perc > 0.0 {
                println!("{}", "-".repeat(64));
                println!("{} ({:.3}%)", found.profit, found.perc);
                print!("{}", found.report());
            }
        }
        Ok(())
    }
}
