//! The set of venue nodes available to a run.

use std::collections::BTreeMap;

use itertools::iproduct;

use crate::currency::Currency;
use crate::node::binance::{BinanceP2p, BinanceSpot, PayMethod};
use crate::node::cryptology::Cryptology;
use crate::node::fees::FixedRate;
use crate::node::garantex::Garantex;
use crate::node::{BoxedNode, ExchangeNode};

/// All nodes of a run, keyed by their unique display key.
///
/// The map is ordered by key, which is what makes cycle enumeration
/// deterministic for a fixed catalog. Inserting a node whose key is already
/// present silently overwrites the previous one; key uniqueness is the catalog
/// builder's obligation, not something corrected here.
#[derive(Clone, Default)]
pub struct NodeCatalog {
    /// Nodes by key
    nodes: BTreeMap<String, BoxedNode>,
}

impl NodeCatalog {
    /// An empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under its own key, overwriting any previous holder.
    pub fn insert(&mut self, node: BoxedNode) {
        self.nodes.insert(node.key(), node);
    }

    /// Insert every node of an iterator.
    pub fn extend(&mut self, nodes: impl IntoIterator<Item = BoxedNode>) {
        for node in nodes {
            self.insert(node);
        }
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the catalog holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look a node up by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&dyn ExchangeNode> {
        self.nodes.get(key).map(AsRef::as_ref)
    }

    /// Nodes in key order.
    pub fn nodes(&self) -> impl Iterator<Item = &dyn ExchangeNode> {
        self.nodes.values().map(AsRef::as_ref)
    }

    /// Keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Keep only the nodes the predicate accepts.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &dyn ExchangeNode) -> bool) {
        self.nodes.retain(|key, node| keep(key, node.as_ref()));
    }

    /// Tear the catalog into owned entries, for stages that need to move
    /// nodes across tasks.
    #[must_use]
    pub fn into_entries(self) -> Vec<(String, BoxedNode)> {
        self.nodes.into_iter().collect()
    }

    /// Rebuild a catalog from owned entries. Ordering is restored from the
    /// keys regardless of the order entries arrive in.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (String, BoxedNode)>) -> Self {
        Self {
            nodes: entries.into_iter().collect(),
        }
    }

    /// The standard venue set for a run. `crypto` switches volatile crypto
    /// instruments on; stablecoin and fiat markets are always included.
    #[must_use]
    pub fn assemble(crypto: bool) -> Self {
        let mut catalog = Self::new();
        catalog.extend(binance_spot(crypto));
        catalog.extend(cryptology(crypto));
        catalog.extend(garantex(crypto));
        catalog.extend(binance_p2p_russia(crypto));
        catalog.extend(binance_p2p_kazakhstan(crypto));
        catalog.extend(binance_p2p_indonesia(crypto));
        catalog.extend(binance_p2p_uzbekistan(crypto));
        catalog.extend(vexel_bridges());
        catalog
    }
}

/// Binance spot pairs against DAI, USDT and the Binance-internal ruble.
fn binance_spot(crypto: bool) -> Vec<BoxedNode> {
    let mut bases = vec![Currency::Usdt, Currency::Busd];
    if crypto {
        bases.extend([
            Currency::Btc,
            Currency::Eth,
            Currency::Bnb,
            Currency::Shib,
            Currency::Doge,
        ]);
    }
    let quotes = [Currency::Dai, Currency::Usdt, Currency::BinanceRub];

    iproduct!(bases, quotes)
        .filter(|(base, quote)| base != quote)
        .map(|(base, quote)| Box::new(BinanceSpot::new(base, quote)) as BoxedNode)
        .collect()
}

/// Cryptology spot markets against bank fiat and stablecoins.
fn cryptology(crypto: bool) -> Vec<BoxedNode> {
    let mut pairs = vec![
        (Currency::Usdt, Currency::Usd),
        (Currency::Busd, Currency::Eur),
        (Currency::Dai, Currency::Eur),
        (Currency::Usdc, Currency::Eur),
        (Currency::Usdt, Currency::Eur),
        (Currency::Busd, Currency::Usdt),
        (Currency::Usdc, Currency::Usdt),
    ];
    if crypto {
        pairs.extend([
            (Currency::Btc, Currency::Usd),
            (Currency::Eth, Currency::Usd),
            (Currency::Shib, Currency::Usd),
            (Currency::Bch, Currency::Usd),
            (Currency::Ltc, Currency::Usd),
            (Currency::Btc, Currency::Eur),
            (Currency::Eth, Currency::Eur),
            (Currency::Bch, Currency::Eur),
            (Currency::Ltc, Currency::Eur),
            (Currency::Btc, Currency::Busd),
            (Currency::Bnb, Currency::Usdt),
            (Currency::Btc, Currency::Usdt),
            (Currency::Shib, Currency::Usdt),
            (Currency::Bch, Currency::Usdt),
            (Currency::Eth, Currency::Usdt),
            (Currency::Ltc, Currency::Usdt),
            (Currency::Btc, Currency::Dai),
            (Currency::Bnb, Currency::Usdc),
            (Currency::Btc, Currency::Usdc),
            (Currency::Eth, Currency::Usdc),
            (Currency::Ltc, Currency::Usdc),
        ]);
    }
    pairs
        .into_iter()
        .map(|(base, quote)| Box::new(Cryptology::new(base, quote)) as BoxedNode)
        .collect()
}

/// Garantex ruble and stablecoin markets.
fn garantex(crypto: bool) -> Vec<BoxedNode> {
    let mut pairs = vec![
        (Currency::Usdt, Currency::Rub),
        (Currency::Dai, Currency::Rub),
        (Currency::Usdc, Currency::Rub),
        (Currency::Usdc, Currency::Usdt),
    ];
    if crypto {
        pairs.extend([
            (Currency::Btc, Currency::Rub),
            (Currency::Eth, Currency::Rub),
            (Currency::Btc, Currency::Usdt),
            (Currency::Eth, Currency::Btc),
            (Currency::Eth, Currency::Usdt),
        ]);
    }
    pairs
        .into_iter()
        .map(|(base, quote)| Box::new(Garantex::new(base, quote)) as BoxedNode)
        .collect()
}

/// Asset set for a P2P market, gated by the crypto switch.
fn p2p_bases(crypto: bool, stable: &[Currency], volatile: &[Currency]) -> Vec<Currency> {
    let mut bases = stable.to_vec();
    if crypto {
        bases.extend_from_slice(volatile);
    }
    bases
}

/// Russian P2P markets: the main banks as one grouped node plus one node per
/// individual method.
fn binance_p2p_russia(crypto: bool) -> Vec<BoxedNode> {
    const MAIN_METHODS: [PayMethod; 5] = [
        PayMethod::Tinkoff,
        PayMethod::RosBank,
        PayMethod::RaiffeisenBankRussia,
        PayMethod::Qiwi,
        PayMethod::PostBankRussia,
    ];
    let bases = p2p_bases(
        crypto,
        &[Currency::Usdt, Currency::Busd, Currency::BinanceRub],
        &[Currency::Btc, Currency::Bnb, Currency::Eth, Currency::Shib],
    );

    let mut nodes = Vec::new();
    for base in &bases {
        nodes.push(
            Box::new(
                BinanceP2p::new(*base, Currency::Rub, MAIN_METHODS.to_vec())
                    .with_label("MainBanks"),
            ) as BoxedNode,
        );
    }
    for method in MAIN_METHODS {
        for base in &bases {
            nodes.push(Box::new(BinanceP2p::new(*base, Currency::Rub, vec![method])) as BoxedNode);
        }
    }
    nodes
}

/// Kazakhstani P2P markets over Jysan Bank.
fn binance_p2p_kazakhstan(crypto: bool) -> Vec<BoxedNode> {
    let bases = p2p_bases(
        crypto,
        &[Currency::Usdt, Currency::Busd, Currency::Dai],
        &[Currency::Btc, Currency::Bnb, Currency::Eth, Currency::Shib],
    );
    let quotes = [Currency::Kzt, Currency::Usd, Currency::Eur];

    iproduct!(bases, quotes)
        .map(|(base, quote)| {
            Box::new(BinanceP2p::new(base, quote, vec![PayMethod::JysanBank])) as BoxedNode
        })
        .collect()
}

/// Indonesian P2P markets per payment method.
fn binance_p2p_indonesia(crypto: bool) -> Vec<BoxedNode> {
    let bases = p2p_bases(
        crypto,
        &[Currency::Usdt, Currency::Busd, Currency::Bidr],
        &[Currency::Btc, Currency::Bnb, Currency::Eth, Currency::Doge],
    );
    let methods = [PayMethod::PermataMe, PayMethod::BankTransfer];

    iproduct!(methods, bases)
        .map(|(method, base)| {
            Box::new(BinanceP2p::new(base, Currency::Idr, vec![method])) as BoxedNode
        })
        .collect()
}

/// Uzbekistani P2P markets per payment method, including remittance rails.
fn binance_p2p_uzbekistan(crypto: bool) -> Vec<BoxedNode> {
    let bases = p2p_bases(
        crypto,
        &[Currency::Usdt, Currency::Busd],
        &[Currency::Btc, Currency::Bnb, Currency::Eth, Currency::Shib],
    );
    let methods = [
        PayMethod::Paysend,
        PayMethod::Uzcard,
        PayMethod::Kapitalbank,
        PayMethod::Tinkoff,
        PayMethod::BankTransfer,
    ];

    iproduct!(methods, bases)
        .map(|(method, base)| {
            Box::new(BinanceP2p::new(base, Currency::Uzs, vec![method])) as BoxedNode
        })
        .collect()
}

/// Fixed-rate bridges from Vexel-internal balances to bank money.
fn vexel_bridges() -> Vec<BoxedNode> {
    vec![
        Box::new(FixedRate::new(
            Currency::VexelRub,
            Currency::Rub,
            None,
            Some(0.98),
            "Vexel2Card",
        )),
        Box::new(FixedRate::new(
            Currency::VexelEur,
            Currency::Eur,
            Some(1.0),
            Some(1.0),
            "Vexel SWIFT/SEPA",
        )),
    ]
}
