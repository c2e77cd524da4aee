//! Adapters for the external collaborators the analysis pipeline depends on.
//!
//! Every adapter maps its loosely-typed JSON payload into the typed model in
//! `crate::models` before returning; nothing past this boundary sees raw JSON.

pub mod cached;
pub mod gemini;
pub mod helius;
pub mod range;
pub mod solana_rpc;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{PrivacySummary, ReputationResult, SanctionsCheck, Severity, TransactionRecord};

pub use cached::{CachedReputation, CachedSanctions};
pub use gemini::GeminiClient;
pub use helius::HeliusClient;
pub use range::RangeClient;
pub use solana_rpc::SolanaRpcClient;

#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),

    #[error("{service} rate limited the request")]
    RateLimited { service: &'static str },

    #[error("{service} returned status {status}")]
    Status { service: &'static str, status: u16 },

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

// Request URLs can carry API keys; never let them reach a log line
impl From<reqwest::Error> for CollaboratorError {
    fn from(e: reqwest::Error) -> Self {
        CollaboratorError::Http(e.without_url())
    }
}

// ---------------------------------------------------------------------------
// Collaborator contracts
// ---------------------------------------------------------------------------

/// Ledger indexer. Must return an empty list, not an error, when the
/// address has no history.
#[async_trait]
pub trait LedgerSource: Send + Sync {
    async fn fetch_transactions(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, CollaboratorError>;
}

#[async_trait]
pub trait ReputationSource: Send + Sync {
    async fn fetch_reputation(&self, address: &str) -> Result<ReputationResult, CollaboratorError>;
}

#[async_trait]
pub trait SanctionsSource: Send + Sync {
    async fn check_sanctions(&self, address: &str) -> Result<SanctionsCheck, CollaboratorError>;
}

#[async_trait]
pub trait MevSource: Send + Sync {
    async fn detect_mev(&self, signature: &str) -> Result<MevDetection, CollaboratorError>;
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, input: &SummaryInput) -> Result<SummarizerOpinion, CollaboratorError>;
}

// ---------------------------------------------------------------------------
// MEV detector output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MevKind {
    Sandwich,
    Frontrun,
    Backrun,
    Jit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MevDetection {
    pub is_mev: bool,
    pub kind: Option<MevKind>,
    /// Lamports.
    pub extracted_value: u64,
    pub confidence: u8,
}

impl MevDetection {
    pub fn none() -> Self {
        Self {
            is_mev: false,
            kind: None,
            extracted_value: 0,
            confidence: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Summarizer input / output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct FindingDigest {
    pub severity: Severity,
    pub title: String,
}

/// Everything the summarizer is told about one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryInput {
    pub address: String,
    pub transaction_count: usize,
    pub unique_interactions: usize,
    pub findings: Vec<FindingDigest>,
    pub has_temporal_patterns: bool,
    pub common_hours: Vec<u8>,
    /// Reputation score rescaled to 0–100.
    pub reputation_score: f64,
    /// Deterministic score computed locally; offered to the summarizer as
    /// a reference and used when it does not answer.
    pub local_score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizerOpinion {
    pub summary: PrivacySummary,
    /// Absent when the summarizer returned prose but no usable number.
    pub privacy_score: Option<u8>,
}

/// Map a non-2xx response onto the error taxonomy.
pub(crate) fn status_error(service: &'static str, status: reqwest::StatusCode) -> CollaboratorError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        CollaboratorError::RateLimited { service }
    } else {
        CollaboratorError::Status {
            service,
            status: status.as_u16(),
        }
    }
}

/// Await a collaborator call under `timeout`. Failures and timeouts are
/// logged, counted, and collapsed to `None` so the caller can substitute its
/// safe default. Dropping the returned future abandons the in-flight call.
pub async fn guarded<T, F>(collaborator: &'static str, timeout: Duration, call: F) -> Option<T>
where
    F: std::future::Future<Output = Result<T, CollaboratorError>>,
{
    let error = match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => return Some(value),
        Ok(Err(e)) => e,
        Err(_) => CollaboratorError::Timeout(timeout),
    };

    tracing::warn!(
        collaborator = collaborator,
        error = %error,
        "Collaborator call failed, degrading signal"
    );
    metrics::counter!("collaborator_failures_total", "collaborator" => collaborator).increment(1);
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_guarded_passes_success_through() {
        let value = guarded("test", Duration::from_secs(1), async { Ok::<_, CollaboratorError>(5) }).await;
        assert_eq!(value, Some(5));
    }

    #[tokio::test]
    async fn test_guarded_collapses_errors() {
        let value: Option<u8> = guarded("test", Duration::from_secs(1), async {
            Err(CollaboratorError::Malformed("bad".into()))
        })
        .await;
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_guarded_times_out() {
        let value: Option<u8> = guarded("test", Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(1)
        })
        .await;
        assert_eq!(value, None);
    }

    #[test]
    fn test_status_error_maps_rate_limit() {
        assert!(matches!(
            status_error("range", reqwest::StatusCode::TOO_MANY_REQUESTS),
            CollaboratorError::RateLimited { service: "range" }
        ));
        assert!(matches!(
            status_error("range", reqwest::StatusCode::BAD_GATEWAY),
            CollaboratorError::Status { status: 502, .. }
        ));
    }
}
