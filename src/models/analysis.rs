use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ReputationResult, RiskFinding, RiskLevel, SanctionsCheck};

// ---------------------------------------------------------------------------
// Temporal
// ---------------------------------------------------------------------------

/// Hour-of-day clustering of a transaction batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalPattern {
    pub has_patterns: bool,
    /// Largest single-hour share, capped at 95; 0 when no hour is common.
    pub confidence: u8,
    /// Hours whose share exceeds 20%, ascending.
    pub common_hours: Vec<u8>,
    pub histogram: [usize; 24],
}

impl Default for TemporalPattern {
    fn default() -> Self {
        Self {
            has_patterns: false,
            confidence: 0,
            common_hours: Vec::new(),
            histogram: [0; 24],
        }
    }
}

// ---------------------------------------------------------------------------
// MEV
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MevExposure {
    pub detected: bool,
    pub count: usize,
    /// Lamports.
    pub total_extracted: u64,
    pub sampled: usize,
}

// ---------------------------------------------------------------------------
// Deanonymization graph
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Wallet,
    Exchange,
    Program,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathNode {
    pub address: String,
    pub kind: NodeKind,
    pub risk: RiskLevel,
    pub tx_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEdge {
    pub from: String,
    pub to: String,
    pub confidence: u8,
}

/// A self-contained graph fragment linking the subject to a counterparty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeanonymizationPath {
    pub nodes: Vec<PathNode>,
    pub edges: Vec<PathEdge>,
}

// ---------------------------------------------------------------------------
// Summary + final result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacySummary {
    pub summary: String,
    pub key_risks: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Where the final privacy score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreSource {
    Summarizer,
    Local,
}

/// Terminal, immutable result of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletAnalysis {
    pub analysis_id: Uuid,
    pub address: String,
    pub privacy_score: u8,
    pub score_source: ScoreSource,
    pub transaction_count: usize,
    pub unique_interactions: usize,
    pub risks: Vec<RiskFinding>,
    pub deanonymization_paths: Vec<DeanonymizationPath>,
    pub mev_exposure: MevExposure,
    pub temporal_analysis: TemporalPattern,
    pub reputation: ReputationResult,
    pub sanctions: SanctionsCheck,
    pub summary: PrivacySummary,
    pub analyzed_at: DateTime<Utc>,
}
