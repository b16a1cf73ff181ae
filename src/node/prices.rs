//! Per-node buy/sell price state with sentinel defaults.

/// The buy/sell quote a node currently holds.
///
/// Freshly constructed pairs carry sentinel values (`buy = +inf`, `sell = 0`)
/// that an exchange rate can never legitimately take; a refresh that obtained
/// real data overwrites them, so "still at the sentinels" doubles as the
/// refresh-failure signal. Sentinels are per-instance fields, never shared
/// defaults.
///
/// `trader_mode` models venues whose raw feed quotes prices from the
/// counterparty's perspective: it swaps which stored price each accessor
/// returns. The flag is fixed at construction.
#[derive(Clone, Copy, Debug)]
pub struct PricePair {
    /// Cost, in quote, to acquire one unit of base (ask side)
    buy: f64,
    /// Quote received per unit of base sold (bid side)
    sell: f64,
    /// Swap the roles of the two stored prices
    trader_mode: bool,
}

impl PricePair {
    /// Initial buy price before any refresh succeeded.
    pub const SENTINEL_BUY: f64 = f64::INFINITY;
    /// Initial sell price before any refresh succeeded.
    pub const SENTINEL_SELL: f64 = 0.0;

    /// A pair still holding its sentinels.
    #[must_use]
    pub const fn new(trader_mode: bool) -> Self {
        Self {
            buy: Self::SENTINEL_BUY,
            sell: Self::SENTINEL_SELL,
            trader_mode,
        }
    }

    /// A pair with fixed rates. A `None` side keeps its sentinel.
    #[must_use]
    pub const fn with_rates(buy: Option<f64>, sell: Option<f64>) -> Self {
        Self {
            buy: match buy {
                Some(price) => price,
                None => Self::SENTINEL_BUY,
            },
            sell: match sell {
                Some(price) => price,
                None => Self::SENTINEL_SELL,
            },
            trader_mode: false,
        }
    }

    /// Overwrite both sides with refreshed data.
    pub fn record(&mut self, buy: f64, sell: f64) {
        self.buy = buy;
        self.sell = sell;
    }

    /// Overwrite the buy side only.
    pub fn record_buy(&mut self, buy: f64) {
        self.buy = buy;
    }

    /// Overwrite the sell side only.
    pub fn record_sell(&mut self, sell: f64) {
        self.sell = sell;
    }

    /// Effective buy price, adjusted for trader mode.
    #[must_use]
    pub const fn buy(&self) -> f64 {
        if self.trader_mode {
            self.sell
        } else {
            self.buy
        }
    }

    /// Effective sell price, adjusted for trader mode.
    #[must_use]
    pub const fn sell(&self) -> f64 {
        if self.trader_mode {
            self.buy
        } else {
            self.sell
        }
    }

    /// True while the pair is unusable: both sides still at their sentinels,
    /// or an effective sell price of exactly zero.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn degenerate(&self) -> bool {
        (self.buy == Self::SENTINEL_BUY && self.sell == Self::SENTINEL_SELL) || self.sell() == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_are_degenerate() {
        let pair = PricePair::new(false);
        assert!(pair.degenerate());
        assert_eq!(pair.buy(), f64::INFINITY);
        assert_eq!(pair.sell(), 0.0);
    }

    #[test]
    fn test_record_clears_degeneracy() {
        let mut pair = PricePair::new(false);
        pair.record(101.0, 99.0);
        assert!(!pair.degenerate());
        assert_eq!(pair.buy(), 101.0);
        assert_eq!(pair.sell(), 99.0);
    }

    #[test]
    fn test_trader_mode_swaps_sides() {
        let mut pair = PricePair::new(true);
        pair.record(101.0, 99.0);
        assert_eq!(pair.buy(), 99.0);
        assert_eq!(pair.sell(), 101.0);
    }

    #[test]
    fn test_zero_sell_is_degenerate() {
        let mut pair = PricePair::new(false);
        pair.record(101.0, 0.0);
        assert!(pair.degenerate());
    }

    #[test]
    fn test_partial_fixed_rates() {
        let pair = PricePair::with_rates(None, Some(0.98));
        assert_eq!(pair.buy(), f64::INFINITY);
        assert_eq!(pair.sell(), 0.98);
        assert!(!pair.degenerate());
    }
}
