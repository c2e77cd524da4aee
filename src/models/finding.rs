use std::fmt;

use serde::{Deserialize, Serialize};

/// Finding severity. Declared most severe first so the derived `Ord`
/// sorts critical findings to the front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }

    /// Points subtracted from the privacy score per finding.
    pub fn score_penalty(&self) -> i32 {
        match self {
            Severity::Critical => 20,
            Severity::High => 10,
            Severity::Medium => 5,
            Severity::Low => 0,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Identity,
    Timing,
    Amount,
    Mev,
    Compliance,
}

/// One detected deanonymization risk. Created by a detector, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFinding {
    /// Stable key per detector, e.g. `kyc-exposure`.
    pub id: String,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    /// 0–100, detector-specific meaning.
    pub confidence: u8,
    pub affected_transactions: usize,
    pub recommendation: String,
    pub category: RiskCategory,
}
