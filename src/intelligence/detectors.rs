use std::collections::BTreeSet;

use super::classifier::CounterpartyIntel;
use crate::models::{
    Counterparties, ReputationResult, RiskCategory, RiskFinding, SanctionsCheck, Severity,
    TemporalPattern, TransactionRecord,
};

/// Distinct-amount ratio above which amounts are considered fingerprintable (70%).
const AMOUNT_RATIO_NUM: usize = 7;
const AMOUNT_RATIO_DEN: usize = 10;
const MAX_AMOUNT_CONFIDENCE: usize = 85;

/// A counterparty seen in more than this many transactions is a repeat.
const REPEAT_TX_THRESHOLD: usize = 3;
/// More than this many repeat counterparties triggers the finding.
const REPEAT_COUNTERPARTY_THRESHOLD: usize = 5;
const MAX_REPEAT_CONFIDENCE: usize = 90;

/// Reputation score (0–10) at which the finding is raised, and at which it
/// becomes critical.
const REPUTATION_HIGH: f64 = 7.0;
const REPUTATION_CRITICAL: f64 = 9.0;

/// Everything a detector may look at. All of it comes from a single fetch batch.
#[derive(Debug, Clone, Copy)]
pub struct DetectionContext<'a> {
    pub subject: &'a str,
    pub transactions: &'a [TransactionRecord],
    pub counterparties: &'a Counterparties,
    pub intel: &'a CounterpartyIntel,
    pub temporal: &'a TemporalPattern,
    pub reputation: &'a ReputationResult,
    pub sanctions: &'a SanctionsCheck,
}

/// The closed set of risk detectors, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectorKind {
    KycExposure,
    TemporalPatterns,
    AmountCorrelation,
    RepeatInteractions,
    ComplianceRisk,
    ReputationRisk,
}

impl DetectorKind {
    pub const ALL: [DetectorKind; 6] = [
        DetectorKind::KycExposure,
        DetectorKind::TemporalPatterns,
        DetectorKind::AmountCorrelation,
        DetectorKind::RepeatInteractions,
        DetectorKind::ComplianceRisk,
        DetectorKind::ReputationRisk,
    ];

    /// Stable finding id emitted by this detector.
    pub fn id(&self) -> &'static str {
        match self {
            DetectorKind::KycExposure => "kyc-exposure",
            DetectorKind::TemporalPatterns => "temporal-patterns",
            DetectorKind::AmountCorrelation => "amount-correlation",
            DetectorKind::RepeatInteractions => "repeat-interactions",
            DetectorKind::ComplianceRisk => "compliance-risk",
            DetectorKind::ReputationRisk => "reputation-risk",
        }
    }

    pub fn category(&self) -> RiskCategory {
        match self {
            DetectorKind::KycExposure | DetectorKind::RepeatInteractions => RiskCategory::Identity,
            DetectorKind::TemporalPatterns => RiskCategory::Timing,
            DetectorKind::AmountCorrelation => RiskCategory::Amount,
            DetectorKind::ComplianceRisk | DetectorKind::ReputationRisk => RiskCategory::Compliance,
        }
    }

    pub fn run(&self, ctx: &DetectionContext<'_>) -> Option<RiskFinding> {
        match self {
            DetectorKind::KycExposure => detect_kyc_exposure(ctx),
            DetectorKind::TemporalPatterns => detect_temporal_patterns(ctx),
            DetectorKind::AmountCorrelation => detect_amount_correlation(ctx),
            DetectorKind::RepeatInteractions => detect_repeat_interactions(ctx),
            DetectorKind::ComplianceRisk => detect_compliance_risk(ctx),
            DetectorKind::ReputationRisk => detect_reputation_risk(ctx),
        }
    }

    fn finding(
        &self,
        severity: Severity,
        title: &str,
        description: String,
        confidence: u8,
        affected_transactions: usize,
        recommendation: &str,
    ) -> RiskFinding {
        RiskFinding {
            id: self.id().to_string(),
            severity,
            title: title.to_string(),
            description,
            confidence: confidence.min(100),
            affected_transactions,
            recommendation: recommendation.to_string(),
            category: self.category(),
        }
    }
}

/// Run every detector against the context. Findings come back in detector
/// order; ranking is the scorer's job.
pub fn run_detectors(ctx: &DetectionContext<'_>) -> Vec<RiskFinding> {
    DetectorKind::ALL
        .iter()
        .filter_map(|detector| detector.run(ctx))
        .collect()
}

/// Number of transactions in the batch touching any of `addresses`.
fn transactions_touching(transactions: &[TransactionRecord], addresses: &BTreeSet<&str>) -> usize {
    transactions
        .iter()
        .filter(|tx| {
            tx.endpoints()
                .any(|(from, to)| addresses.contains(from) || addresses.contains(to))
        })
        .count()
}

// ---------------------------------------------------------------------------
// Detector 1: KYC / exchange linkage
// ---------------------------------------------------------------------------

fn detect_kyc_exposure(ctx: &DetectionContext<'_>) -> Option<RiskFinding> {
    let exchanges: BTreeSet<&str> = ctx
        .counterparties
        .addresses()
        .filter(|addr| ctx.intel.is_exchange(addr))
        .collect();

    if exchanges.is_empty() {
        return None;
    }

    Some(DetectorKind::KycExposure.finding(
        Severity::Critical,
        "Linked KYC Exchange Wallet",
        format!(
            "Detected interactions with {} known exchange address(es). Your identity may be \
             linked to this wallet through exchange KYC records.",
            exchanges.len()
        ),
        95,
        transactions_touching(ctx.transactions, &exchanges),
        "Route funds through intermediate wallets or a privacy protocol before and after \
         exchange deposits to break the link between your identity and on-chain activity.",
    ))
}

// ---------------------------------------------------------------------------
// Detector 2: temporal correlation
// ---------------------------------------------------------------------------

fn detect_temporal_patterns(ctx: &DetectionContext<'_>) -> Option<RiskFinding> {
    if !ctx.temporal.has_patterns {
        return None;
    }

    let hours = ctx
        .temporal
        .common_hours
        .iter()
        .map(|h| format!("{h:02}:00"))
        .collect::<Vec<_>>()
        .join(", ");
    let confidence = ctx.temporal.confidence;

    Some(DetectorKind::TemporalPatterns.finding(
        Severity::High,
        "Predictable Transaction Timing",
        format!(
            "Up to {confidence}% of your transactions fall in a single hour; activity clusters \
             at {hours}. This pattern can reveal your timezone and daily schedule."
        ),
        confidence,
        ctx.transactions.len() * confidence as usize / 100,
        "Randomize transaction timing or use scheduled transactions to break temporal patterns.",
    ))
}

// ---------------------------------------------------------------------------
// Detector 3: amount correlation
// ---------------------------------------------------------------------------

fn detect_amount_correlation(ctx: &DetectionContext<'_>) -> Option<RiskFinding> {
    let tx_count = ctx.transactions.len();
    if tx_count == 0 {
        return None;
    }

    let distinct: BTreeSet<u64> = ctx.transactions.iter().flat_map(|tx| tx.amounts()).collect();
    let distinct = distinct.len();

    // distinct / tx_count > 0.7, kept in integers
    if distinct * AMOUNT_RATIO_DEN <= tx_count * AMOUNT_RATIO_NUM {
        return None;
    }

    let confidence = (distinct * 100 / tx_count).min(MAX_AMOUNT_CONFIDENCE) as u8;

    Some(DetectorKind::AmountCorrelation.finding(
        Severity::Medium,
        "Unique Transaction Amounts",
        format!(
            "{distinct} distinct transfer amounts across {tx_count} transactions. Specific \
             amounts can be matched across wallets to link them."
        ),
        confidence,
        tx_count,
        "Use round numbers or add small random amounts to obscure exact transfer values.",
    ))
}

// ---------------------------------------------------------------------------
// Detector 4: repeat interactions
// ---------------------------------------------------------------------------

fn detect_repeat_interactions(ctx: &DetectionContext<'_>) -> Option<RiskFinding> {
    let total = ctx.counterparties.len();
    if total == 0 {
        return None;
    }

    let repeats: BTreeSet<&str> = ctx
        .counterparties
        .iter()
        .filter(|(_, count)| *count > REPEAT_TX_THRESHOLD)
        .map(|(addr, _)| addr)
        .collect();

    if repeats.len() <= REPEAT_COUNTERPARTY_THRESHOLD {
        return None;
    }

    let confidence = (repeats.len() * 100 / total).min(MAX_REPEAT_CONFIDENCE) as u8;

    Some(DetectorKind::RepeatInteractions.finding(
        Severity::Medium,
        "Frequent Repeat Interactions",
        format!(
            "You repeatedly transact with {} addresses (more than {} transactions each). \
             This creates a linkable social graph.",
            repeats.len(),
            REPEAT_TX_THRESHOLD
        ),
        confidence,
        transactions_touching(ctx.transactions, &repeats),
        "Diversify counterparties or use fresh receiving addresses to break association patterns.",
    ))
}

// ---------------------------------------------------------------------------
// Detector 5: sanctions / blacklist
// ---------------------------------------------------------------------------

fn detect_compliance_risk(ctx: &DetectionContext<'_>) -> Option<RiskFinding> {
    if !ctx.sanctions.is_flagged() {
        return None;
    }

    let description = if ctx.sanctions.is_ofac_sanctioned {
        "This address is on the OFAC sanctions list."
    } else {
        "This address is flagged on a token issuer blacklist."
    };

    Some(DetectorKind::ComplianceRisk.finding(
        Severity::Critical,
        "Compliance Risk Detected",
        description.to_string(),
        100,
        0,
        "Contact compliance support immediately. Assets held by this wallet may be frozen or restricted.",
    ))
}

// ---------------------------------------------------------------------------
// Detector 6: reputation escalation
// ---------------------------------------------------------------------------

fn detect_reputation_risk(ctx: &DetectionContext<'_>) -> Option<RiskFinding> {
    let score = ctx.reputation.risk_score;
    if score.is_nan() || score < REPUTATION_HIGH {
        return None;
    }

    let severity = if score >= REPUTATION_CRITICAL {
        Severity::Critical
    } else {
        Severity::High
    };

    let mut description = format!(
        "External reputation scoring rates this address {score:.1}/10 ({}).",
        ctx.reputation.level()
    );
    let flagged = ctx.reputation.malicious_addresses_found.len();
    if flagged > 0 {
        description.push_str(&format!(
            " {flagged} flagged address(es) found within {} hop(s).",
            ctx.reputation.num_hops
        ));
    }

    Some(DetectorKind::ReputationRisk.finding(
        severity,
        "High-Risk Address Reputation",
        description,
        90,
        0,
        "Avoid further interaction with flagged counterparties and move funds to a fresh wallet \
         with no link to this history.",
    ))
}
