use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::types::{RawAddressRisk, RawSanctions};
use super::{status_error, CollaboratorError, ReputationSource, SanctionsSource};
use crate::models::{ReputationResult, SanctionsCheck};

pub const RANGE_API_BASE: &str = "https://api.range.org/v1";

/// Address-risk and sanctions lookups against the Range API.
#[derive(Debug, Clone)]
pub struct RangeClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl RangeClient {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CollaboratorError> {
        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(status_error("range", resp.status()));
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| CollaboratorError::Malformed(format!("range: {e}")))
    }
}

#[async_trait]
impl ReputationSource for RangeClient {
    async fn fetch_reputation(&self, address: &str) -> Result<ReputationResult, CollaboratorError> {
        let url = format!(
            "{}/risk/address?network=solana&address={}",
            self.base_url, address
        );
        let raw: RawAddressRisk = self.get_json(&url).await?;
        Ok(raw.into_result(address))
    }
}

#[async_trait]
impl SanctionsSource for RangeClient {
    async fn check_sanctions(&self, address: &str) -> Result<SanctionsCheck, CollaboratorError> {
        let url = format!(
            "{}/risk/sanctions/{}?include_details=true",
            self.base_url, address
        );
        let raw: RawSanctions = self.get_json(&url).await?;
        Ok(raw.into_check(address))
    }
}
