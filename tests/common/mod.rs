use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use echo_privacy::clients::{
    CollaboratorError, LedgerSource, MevDetection, MevKind, MevSource, ReputationSource,
    SanctionsSource, SummarizerOpinion, Summarizer, SummaryInput,
};
use echo_privacy::intelligence::StaticDirectory;
use echo_privacy::models::{
    NativeTransfer, PrivacySummary, ReputationResult, SanctionsCheck, TransactionRecord,
};
use echo_privacy::services::{AnalyzerSettings, Collaborators, PrivacyAnalyzer};

/// A valid base58 Solana address used as the analysis subject.
#[allow(dead_code)]
pub const SUBJECT: &str = "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T";

/// Listed in the default exchange directory.
#[allow(dead_code)]
pub const KNOWN_EXCHANGE: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";

/// 2023-11-15 00:00:00 UTC
#[allow(dead_code)]
pub const BASE_TS: i64 = 1_700_006_400;

/// Native transfer from the subject to `to`.
#[allow(dead_code)]
pub fn transfer(sig: &str, timestamp: i64, to: &str, amount: u64) -> TransactionRecord {
    TransactionRecord {
        signature: sig.into(),
        timestamp,
        kind: "TRANSFER".into(),
        source: "SYSTEM_PROGRAM".into(),
        fee: 5_000,
        fee_payer: SUBJECT.into(),
        slot: 250_000_000,
        native_transfers: vec![NativeTransfer {
            from: SUBJECT.into(),
            to: to.into(),
            amount,
        }],
        token_transfers: vec![],
    }
}

/// `count` transfers to `peers` distinct counterparties, round-robin,
/// spread over the day with distinct amounts.
#[allow(dead_code)]
pub fn busy_history(count: usize, peers: usize) -> Vec<TransactionRecord> {
    (0..count)
        .map(|i| {
            transfer(
                &format!("sig{i:04}"),
                BASE_TS + (i as i64 % 24) * 3_600 + (i as i64 / 24) * 86_400,
                &format!("Peer{:04}", i % peers),
                1_000_000 + i as u64,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Stub collaborators
// ---------------------------------------------------------------------------

/// Ledger returning a fixed batch.
pub struct StubLedger {
    pub transactions: Vec<TransactionRecord>,
}

#[async_trait]
impl LedgerSource for StubLedger {
    async fn fetch_transactions(
        &self,
        _address: &str,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, CollaboratorError> {
        Ok(self.transactions.iter().take(limit).cloned().collect())
    }
}

/// Reputation with an optional per-address override.
#[derive(Default)]
pub struct StubReputation {
    pub subject_score: f64,
    pub overrides: HashMap<String, ReputationResult>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl ReputationSource for StubReputation {
    async fn fetch_reputation(&self, address: &str) -> Result<ReputationResult, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(result) = self.overrides.get(address) {
            return Ok(result.clone());
        }
        let mut result = ReputationResult::unavailable(address, "stub");
        if address == SUBJECT {
            result.risk_score = self.subject_score;
            result.risk_level = "LOW".into();
        }
        Ok(result)
    }
}

#[derive(Default)]
pub struct StubSanctions {
    pub sanctioned: bool,
}

#[async_trait]
impl SanctionsSource for StubSanctions {
    async fn check_sanctions(&self, address: &str) -> Result<SanctionsCheck, CollaboratorError> {
        let mut check = SanctionsCheck::clear(address);
        check.is_ofac_sanctioned = self.sanctioned;
        Ok(check)
    }
}

/// Flags the listed signatures as sandwiches and counts every call.
#[derive(Default)]
pub struct CountingMev {
    pub flagged: HashSet<String>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl MevSource for CountingMev {
    async fn detect_mev(&self, signature: &str) -> Result<MevDetection, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.flagged.contains(signature) {
            return Ok(MevDetection {
                is_mev: true,
                kind: Some(MevKind::Sandwich),
                extracted_value: 50_000,
                confidence: 85,
            });
        }
        Ok(MevDetection::none())
    }
}

/// Summarizer that either answers with a fixed score or is unavailable.
#[derive(Default)]
pub struct StubSummarizer {
    pub score: Option<u8>,
}

#[async_trait]
impl Summarizer for StubSummarizer {
    async fn summarize(&self, input: &SummaryInput) -> Result<SummarizerOpinion, CollaboratorError> {
        let Some(score) = self.score else {
            return Err(CollaboratorError::NotConfigured("summarizer"));
        };
        Ok(SummarizerOpinion {
            summary: PrivacySummary {
                summary: format!("Stub summary for {} transactions.", input.transaction_count),
                key_risks: input.findings.iter().map(|f| f.title.clone()).collect(),
                recommendations: vec!["Stay private".into()],
            },
            privacy_score: Some(score),
        })
    }
}

/// Every collaborator, always failing.
pub struct Outage;

#[async_trait]
impl LedgerSource for Outage {
    async fn fetch_transactions(
        &self,
        _address: &str,
        _limit: usize,
    ) -> Result<Vec<TransactionRecord>, CollaboratorError> {
        Err(CollaboratorError::Status {
            service: "ledger",
            status: 503,
        })
    }
}

#[async_trait]
impl ReputationSource for Outage {
    async fn fetch_reputation(&self, _address: &str) -> Result<ReputationResult, CollaboratorError> {
        Err(CollaboratorError::RateLimited { service: "range" })
    }
}

#[async_trait]
impl SanctionsSource for Outage {
    async fn check_sanctions(&self, _address: &str) -> Result<SanctionsCheck, CollaboratorError> {
        Err(CollaboratorError::Malformed("garbage".into()))
    }
}

#[async_trait]
impl MevSource for Outage {
    async fn detect_mev(&self, _signature: &str) -> Result<MevDetection, CollaboratorError> {
        Err(CollaboratorError::Timeout(Duration::from_millis(1)))
    }
}

#[async_trait]
impl Summarizer for Outage {
    async fn summarize(&self, _input: &SummaryInput) -> Result<SummarizerOpinion, CollaboratorError> {
        Err(CollaboratorError::NotConfigured("gemini"))
    }
}

/// Ledger that never answers within any reasonable timeout.
pub struct HangingLedger;

#[async_trait]
impl LedgerSource for HangingLedger {
    async fn fetch_transactions(
        &self,
        _address: &str,
        _limit: usize,
    ) -> Result<Vec<TransactionRecord>, CollaboratorError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(vec![])
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Collaborators that answer with clean defaults for the given history.
#[allow(dead_code)]
pub fn healthy_collaborators(transactions: Vec<TransactionRecord>) -> Collaborators {
    Collaborators {
        ledger: Arc::new(StubLedger { transactions }),
        reputation: Arc::new(StubReputation::default()),
        sanctions: Arc::new(StubSanctions::default()),
        mev: Arc::new(CountingMev::default()),
        summarizer: Arc::new(StubSummarizer::default()),
    }
}

#[allow(dead_code)]
pub fn outage_collaborators() -> Collaborators {
    let outage = Arc::new(Outage);
    Collaborators {
        ledger: outage.clone(),
        reputation: outage.clone(),
        sanctions: outage.clone(),
        mev: outage.clone(),
        summarizer: outage,
    }
}

#[allow(dead_code)]
pub fn test_settings() -> AnalyzerSettings {
    AnalyzerSettings {
        collaborator_timeout: Duration::from_millis(200),
        ..AnalyzerSettings::default()
    }
}

#[allow(dead_code)]
pub fn build_analyzer(collaborators: Collaborators) -> PrivacyAnalyzer {
    PrivacyAnalyzer::new(
        collaborators,
        Arc::new(StaticDirectory::default()),
        test_settings(),
    )
}
