use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::types::RawEnhancedTransaction;
use super::{status_error, CollaboratorError, LedgerSource};
use crate::models::{short_address, TransactionRecord};

pub const HELIUS_API_BASE: &str = "https://api.helius.xyz/v0";

/// The enhanced-transactions endpoint caps a page at 100 records.
const MAX_PAGE_SIZE: usize = 100;

/// Ledger indexer backed by the Helius enhanced-transactions API.
#[derive(Debug, Clone)]
pub struct HeliusClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl HeliusClient {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl LedgerSource for HeliusClient {
    async fn fetch_transactions(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, CollaboratorError> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let url = format!(
            "{}/addresses/{}/transactions?api-key={}&limit={}",
            self.base_url, address, self.api_key, limit
        );

        tracing::debug!(address = %short_address(address), limit, "Fetching transactions from Helius");

        let resp = self.http.get(&url).send().await?;

        // No history is not an error
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !resp.status().is_success() {
            return Err(status_error("helius", resp.status()));
        }

        let body = resp.text().await?;
        let raw: Vec<RawEnhancedTransaction> = serde_json::from_str(&body)
            .map_err(|e| CollaboratorError::Malformed(format!("helius transactions: {e}")))?;

        let records: Vec<TransactionRecord> = raw
            .into_iter()
            .take(limit)
            .map(|tx| tx.into_record(address))
            .collect();

        tracing::debug!(
            address = %short_address(address),
            count = records.len(),
            "Helius returned transactions"
        );

        Ok(records)
    }
}
