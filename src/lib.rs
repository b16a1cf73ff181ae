/*!
 * # Carousel - Circular Conversion-Chain Finder
 *
 * Carousel is a Rust-based system for finding profitable circular
 * currency-conversion chains across heterogeneous venues: exchange order
 * books, P2P marketplaces and fixed-rate bridges.
 *
 * ## Core Features
 *
 * - **Conversion Graph**: Models every market as a node between exactly two currencies
 * - **Concurrent Refresh**: Pulls live prices from all venues over a bounded worker pool
 * - **Cycle Enumeration**: Walks the graph for loops of a fixed length returning to a target currency
 * - **Yield Simulation**: Pushes a starting balance around each loop and ranks the outcomes
 *
 * ## Module Structure
 *
 * - `analyzer`: Yield simulation, ranking and reporting
 * - `balance`: Currency-bound amounts and their arithmetic
 * - `catalog`: The venue-node set of a run
 * - `currency`: Currency identifiers and families
 * - `node`: The exchange-node capability and venue clients
 * - `refresh`: Concurrent price refresh
 * - `route`: Node chains and balance flow
 * - `search`: Cycle enumeration over the graph
 * - `utils`: Utility functions and helpers
 */

/// Yield simulation, ranking and reporting
pub mod analyzer;
/// Currency-bound amounts and their arithmetic
pub mod balance;
/// The venue-node set of a run
pub mod catalog;
/// Currency identifiers and families
pub mod currency;
/// The exchange-node capability and venue clients
pub mod node;
/// Concurrent price refresh
pub mod refresh;
/// Node chains and balance flow
pub mod route;
/// Cycle enumeration over the graph
pub mod search;
/// Utility functions and helpers
pub mod utils;

#[cfg(test)]
/// Shared constructors for unit tests
mod test_helpers;
