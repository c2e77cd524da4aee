use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::models::{NodeKind, RiskLevel};

/// Decides what kind of node an address is in the deanonymization graph.
pub trait AddressClassifier: Send + Sync {
    fn classify(&self, address: &str) -> NodeKind;
}

/// Core Solana programs and the busiest DEX programs.
const KNOWN_PROGRAMS: &[&str] = &[
    "11111111111111111111111111111111",
    "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA",
    "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL",
    "ComputeBudget111111111111111111111111111111",
    "JUP6LkbZbjS1jKKwapdHNy74zcZ3tLUZoi5QNyVTaV4",
    "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8",
    "whirLbMiicVdio4qvUfM5KAg6Ct8VwpYzGff3uctyCc",
];

/// Publicly labelled hot wallets of centralized exchanges.
const KNOWN_EXCHANGES: &[&str] = &[
    "5tzFkiKscXHK5ZXCGbXZxdw7gTjjD1mBwuoFbhUvuAi9",
    "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM",
    "H8sMJSCQxfKiFTCfDR3DUMLPwcRbM61LGFJ8N4dK3WjS",
    "2AQdpHJ2JpcEgPiATUXjQxA8QmafFegfQwSLWSprPicm",
    "FWznbcNXWQuHTawe9RxvQ2LdCENssh12dsznf4RiouN5",
];

/// Lookup-table classifier. Anything not listed is a plain wallet.
#[derive(Debug, Clone)]
pub struct StaticDirectory {
    exchanges: HashSet<String>,
    programs: HashSet<String>,
}

impl Default for StaticDirectory {
    fn default() -> Self {
        Self {
            exchanges: KNOWN_EXCHANGES.iter().map(|a| a.to_string()).collect(),
            programs: KNOWN_PROGRAMS.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl StaticDirectory {
    /// Directory with no entries at all.
    pub fn empty() -> Self {
        Self {
            exchanges: HashSet::new(),
            programs: HashSet::new(),
        }
    }

    pub fn with_exchanges<I, S>(mut self, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exchanges.extend(addresses.into_iter().map(Into::into));
        self
    }

    pub fn with_programs<I, S>(mut self, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.programs.extend(addresses.into_iter().map(Into::into));
        self
    }
}

impl AddressClassifier for StaticDirectory {
    fn classify(&self, address: &str) -> NodeKind {
        if self.exchanges.contains(address) {
            NodeKind::Exchange
        } else if self.programs.contains(address) {
            NodeKind::Program
        } else {
            NodeKind::Wallet
        }
    }
}

// ---------------------------------------------------------------------------
// Counterparty intelligence gathered during enrichment
// ---------------------------------------------------------------------------

/// What enrichment learned about the counterparties of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterpartyIntel {
    /// Counterparties known to be exchanges, either from the classifier or
    /// from reputation attribution.
    pub exchanges: BTreeSet<String>,
    /// Normalized reputation level per looked-up counterparty.
    pub risk_levels: BTreeMap<String, RiskLevel>,
}

impl CounterpartyIntel {
    pub fn is_exchange(&self, address: &str) -> bool {
        self.exchanges.contains(address)
    }

    pub fn risk_level(&self, address: &str) -> Option<RiskLevel> {
        self.risk_levels.get(address).copied()
    }
}
