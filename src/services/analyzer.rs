use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{FixedOffset, Offset, Utc};
use futures_util::future::join_all;
use metrics::{counter, histogram};
use uuid::Uuid;

use crate::clients::{
    guarded, FindingDigest, LedgerSource, MevSource, ReputationSource, SanctionsSource,
    Summarizer, SummaryInput,
};
use crate::intelligence::{
    analyze_mev_exposure, analyze_temporal_patterns, build_paths, fallback_summary,
    local_privacy_score, rank_findings, resolve_score, run_detectors, AddressClassifier,
    CounterpartyIntel, DetectionContext, ScoreInput,
};
use crate::models::{
    short_address, Counterparties, NodeKind, ReputationResult, RiskLevel, SanctionsCheck,
    WalletAnalysis,
};

/// Counterparty reputation lookups in flight at once during enrichment.
const ENRICHMENT_CONCURRENCY: usize = 4;

/// The external services one analysis run talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub ledger: Arc<dyn LedgerSource>,
    pub reputation: Arc<dyn ReputationSource>,
    pub sanctions: Arc<dyn SanctionsSource>,
    pub mev: Arc<dyn MevSource>,
    pub summarizer: Arc<dyn Summarizer>,
}

#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    /// Maximum transactions fetched per analysis.
    pub transaction_limit: usize,
    /// Transactions inspected by the MEV scan.
    pub mev_sample_size: usize,
    /// Counterparties looked up during exchange enrichment.
    pub exchange_lookup_limit: usize,
    /// Per-call timeout applied to every collaborator.
    pub collaborator_timeout: Duration,
    /// Zone used for hour-of-day bucketing.
    pub utc_offset: FixedOffset,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            transaction_limit: 100,
            mev_sample_size: 20,
            exchange_lookup_limit: 20,
            collaborator_timeout: Duration::from_secs(10),
            utc_offset: Utc.fix(),
        }
    }
}

/// Runs the privacy analysis pipeline for one address at a time. Holds no
/// per-run state, so one instance is shared across all requests.
pub struct PrivacyAnalyzer {
    collaborators: Collaborators,
    classifier: Arc<dyn AddressClassifier>,
    settings: AnalyzerSettings,
}

impl PrivacyAnalyzer {
    pub fn new(
        collaborators: Collaborators,
        classifier: Arc<dyn AddressClassifier>,
        settings: AnalyzerSettings,
    ) -> Self {
        Self {
            collaborators,
            classifier,
            settings,
        }
    }

    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }

    /// Analyze `address` end to end.
    ///
    /// Never fails: each collaborator that errors, times out or returns junk
    /// degrades its own signal to a safe default and the run continues.
    /// Dropping the returned future abandons any in-flight calls.
    ///
    /// Steps:
    /// 1. Fetch transactions, reputation and sanctions concurrently
    /// 2. Derive counterparties and the temporal pattern from the batch
    /// 3. MEV scan alongside enrichment, detectors and path building
    /// 4. Score, rank, and ask the summarizer for its opinion
    pub async fn analyze(&self, address: &str) -> WalletAnalysis {
        let start = Instant::now();
        let analysis_id = Uuid::new_v4();
        let timeout = self.settings.collaborator_timeout;

        tracing::info!(
            analysis_id = %analysis_id,
            address = %short_address(address),
            "Starting privacy analysis"
        );

        // Step 1: independent lookups
        let (transactions, reputation, sanctions) = tokio::join!(
            guarded(
                "ledger",
                timeout,
                self.collaborators
                    .ledger
                    .fetch_transactions(address, self.settings.transaction_limit),
            ),
            guarded(
                "reputation",
                timeout,
                self.collaborators.reputation.fetch_reputation(address),
            ),
            guarded(
                "sanctions",
                timeout,
                self.collaborators.sanctions.check_sanctions(address),
            ),
        );

        let mut transactions = transactions.unwrap_or_default();
        transactions.truncate(self.settings.transaction_limit);
        let reputation = reputation.unwrap_or_else(|| {
            ReputationResult::unavailable(address, "Reputation service unavailable")
        });
        let sanctions = sanctions.unwrap_or_else(|| SanctionsCheck::clear(address));

        // Step 2: everything below sees this one batch
        let counterparties = Counterparties::derive(address, &transactions);
        let temporal = analyze_temporal_patterns(&transactions, self.settings.utc_offset);

        tracing::debug!(
            analysis_id = %analysis_id,
            transactions = transactions.len(),
            counterparties = counterparties.len(),
            common_hours = ?temporal.common_hours,
            "Batch fetched"
        );

        // Step 3: the MEV scan is the slow, sequential part; overlap it with the rest
        let (mev_exposure, (mut findings, deanonymization_paths)) = tokio::join!(
            analyze_mev_exposure(
                self.collaborators.mev.as_ref(),
                &transactions,
                self.settings.mev_sample_size,
                timeout,
            ),
            async {
                let intel = self.enrich_counterparties(&counterparties).await;
                let ctx = DetectionContext {
                    subject: address,
                    transactions: &transactions,
                    counterparties: &counterparties,
                    intel: &intel,
                    temporal: &temporal,
                    reputation: &reputation,
                    sanctions: &sanctions,
                };
                let findings = run_detectors(&ctx);
                let paths = build_paths(address, &counterparties, self.classifier.as_ref(), &intel);
                (findings, paths)
            }
        );

        // Step 4: score and summarize
        rank_findings(&mut findings);
        let local_score = local_privacy_score(&ScoreInput {
            findings: &findings,
            unique_interactions: counterparties.len(),
            reputation_score: reputation.risk_score,
        });

        let summary_input = SummaryInput {
            address: address.to_string(),
            transaction_count: transactions.len(),
            unique_interactions: counterparties.len(),
            findings: findings
                .iter()
                .map(|f| FindingDigest {
                    severity: f.severity,
                    title: f.title.clone(),
                })
                .collect(),
            has_temporal_patterns: temporal.has_patterns,
            common_hours: temporal.common_hours.clone(),
            reputation_score: reputation.normalized_score(),
            local_score,
        };
        let opinion = guarded(
            "summarizer",
            timeout,
            self.collaborators.summarizer.summarize(&summary_input),
        )
        .await;

        let (privacy_score, score_source) =
            resolve_score(opinion.as_ref().and_then(|o| o.privacy_score), local_score);
        let summary = match opinion {
            Some(opinion) => opinion.summary,
            None => fallback_summary(
                transactions.len(),
                counterparties.len(),
                &findings,
                privacy_score,
            ),
        };

        counter!("analyses_total").increment(1);
        for finding in &findings {
            counter!("risk_findings_total", "severity" => finding.severity.as_str()).increment(1);
        }
        let elapsed = start.elapsed();
        histogram!("analysis_latency_seconds").record(elapsed.as_secs_f64());

        tracing::info!(
            analysis_id = %analysis_id,
            address = %short_address(address),
            privacy_score = privacy_score,
            score_source = ?score_source,
            findings = findings.len(),
            mev_detected = mev_exposure.detected,
            elapsed_ms = elapsed.as_millis() as u64,
            "Privacy analysis complete"
        );

        WalletAnalysis {
            analysis_id,
            address: address.to_string(),
            privacy_score,
            score_source,
            transaction_count: transactions.len(),
            unique_interactions: counterparties.len(),
            risks: findings,
            deanonymization_paths,
            mev_exposure,
            temporal_analysis: temporal,
            reputation,
            sanctions,
            summary,
            analyzed_at: Utc::now(),
        }
    }

    /// Mark exchange counterparties and collect elevated reputation levels.
    ///
    /// Every counterparty is checked against the classifier; only the most
    /// active `exchange_lookup_limit` are looked up remotely. A failed lookup
    /// just leaves that address unenriched.
    async fn enrich_counterparties(&self, counterparties: &Counterparties) -> CounterpartyIntel {
        let mut intel = CounterpartyIntel::default();

        for address in counterparties.addresses() {
            if self.classifier.classify(address) == NodeKind::Exchange {
                intel.exchanges.insert(address.to_string());
            }
        }

        let candidates = counterparties.most_active(self.settings.exchange_lookup_limit);
        if candidates.is_empty() {
            return intel;
        }

        let reputation = &self.collaborators.reputation;
        let timeout = self.settings.collaborator_timeout;
        let mut lookups: Vec<(&str, Option<ReputationResult>)> = Vec::with_capacity(candidates.len());
        for chunk in candidates.chunks(ENRICHMENT_CONCURRENCY) {
            let results = join_all(chunk.iter().map(|&(address, _)| {
                guarded(
                    "counterparty_reputation",
                    timeout,
                    reputation.fetch_reputation(address),
                )
            }))
            .await;
            lookups.extend(chunk.iter().map(|&(address, _)| address).zip(results));
        }

        for (address, result) in lookups {
            let Some(result) = result else { continue };

            if result.attribution.as_ref().is_some_and(|a| a.is_exchange()) {
                intel.exchanges.insert(address.to_string());
            }
            let level = result.level();
            if level > RiskLevel::Low {
                intel.risk_levels.insert(address.to_string(), level);
            }
        }

        tracing::debug!(
            exchanges = intel.exchanges.len(),
            flagged = intel.risk_levels.len(),
            "Counterparty enrichment complete"
        );

        intel
    }
}
