use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Lamport transfer inside a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeTransfer {
    pub from: String,
    pub to: String,
    pub amount: u64,
}

/// SPL token transfer inside a transaction. `amount` is in the mint's base units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransfer {
    pub from: String,
    pub to: String,
    pub mint: String,
    pub amount: u64,
}

/// One ledger event as returned by the indexer, already normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub signature: String,
    /// Block time, epoch seconds.
    pub timestamp: i64,
    pub kind: String,
    pub source: String,
    pub fee: u64,
    pub fee_payer: String,
    pub slot: u64,
    pub native_transfers: Vec<NativeTransfer>,
    pub token_transfers: Vec<TokenTransfer>,
}

impl TransactionRecord {
    /// Every (from, to) endpoint pair in this transaction, native first.
    pub fn endpoints(&self) -> impl Iterator<Item = (&str, &str)> {
        self.native_transfers
            .iter()
            .map(|t| (t.from.as_str(), t.to.as_str()))
            .chain(
                self.token_transfers
                    .iter()
                    .map(|t| (t.from.as_str(), t.to.as_str())),
            )
    }

    /// Every transfer amount in this transaction, native and token alike.
    pub fn amounts(&self) -> impl Iterator<Item = u64> + '_ {
        self.native_transfers
            .iter()
            .map(|t| t.amount)
            .chain(self.token_transfers.iter().map(|t| t.amount))
    }

    /// Whether `address` is an endpoint of any transfer in this transaction.
    pub fn involves(&self, address: &str) -> bool {
        self.endpoints().any(|(from, to)| from == address || to == address)
    }
}

// ---------------------------------------------------------------------------
// Counterparties, derived from one fetch batch
// ---------------------------------------------------------------------------

/// Distinct transfer endpoints other than the subject, each with the number
/// of transactions it appears in. Backed by a BTreeMap so iteration order is
/// stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Counterparties {
    tx_counts: BTreeMap<String, usize>,
}

impl Counterparties {
    pub fn derive(subject: &str, transactions: &[TransactionRecord]) -> Self {
        let mut tx_counts: BTreeMap<String, usize> = BTreeMap::new();

        for tx in transactions {
            // Count each counterparty once per transaction
            let mut seen: BTreeSet<&str> = BTreeSet::new();
            for (from, to) in tx.endpoints() {
                for addr in [from, to] {
                    if addr != subject && !addr.is_empty() {
                        seen.insert(addr);
                    }
                }
            }
            for addr in seen {
                *tx_counts.entry(addr.to_string()).or_insert(0) += 1;
            }
        }

        Self { tx_counts }
    }

    pub fn len(&self) -> usize {
        self.tx_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx_counts.is_empty()
    }

    pub fn contains(&self, address: &str) -> bool {
        self.tx_counts.contains_key(address)
    }

    /// Number of transactions the counterparty appears in (0 if unknown).
    pub fn tx_count(&self, address: &str) -> usize {
        self.tx_counts.get(address).copied().unwrap_or(0)
    }

    /// Addresses in ascending order.
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.tx_counts.keys().map(String::as_str)
    }

    /// (address, tx count) pairs in ascending address order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.tx_counts.iter().map(|(a, c)| (a.as_str(), *c))
    }

    /// Up to `limit` counterparties, most-interacted first, ties broken by address.
    pub fn most_active(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(limit);
        ranked
    }
}
