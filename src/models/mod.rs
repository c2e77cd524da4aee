pub mod analysis;
pub mod finding;
pub mod reputation;
pub mod transaction;

pub use analysis::{
    DeanonymizationPath, MevExposure, NodeKind, PathEdge, PathNode, PrivacySummary, ScoreSource,
    TemporalPattern, WalletAnalysis,
};
pub use finding::{RiskCategory, RiskFinding, Severity};
pub use reputation::{
    Attribution, FlaggedAddress, ReputationResult, SanctionsAttribution, SanctionsCheck,
};
pub use transaction::{Counterparties, NativeTransfer, TokenTransfer, TransactionRecord};

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// RiskLevel: normalized level shared by reputation results and graph nodes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Map a free-form collaborator label ("HIGH", "Severe risk", ...) onto
    /// the internal scale. Unknown labels are treated as low.
    pub fn from_label(label: &str) -> Self {
        let level = label.to_uppercase();
        if level.contains("CRITICAL") || level.contains("SEVERE") {
            RiskLevel::Critical
        } else if level.contains("HIGH") {
            RiskLevel::High
        } else if level.contains("MEDIUM") || level.contains("MODERATE") {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shorten an address for log lines: `8xR7...g3Ks`.
pub fn short_address(address: &str) -> String {
    if address.len() > 10 && address.is_ascii() {
        format!("{}...{}", &address[..4], &address[address.len() - 4..])
    } else {
        address.to_string()
    }
}
