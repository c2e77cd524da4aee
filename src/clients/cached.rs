use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;

use super::{CollaboratorError, ReputationSource, SanctionsSource};
use crate::cache::ResultCache;
use crate::models::{short_address, ReputationResult, SanctionsCheck};

/// Reputation lookups served from a TTL cache when possible.
/// Only successful answers are cached; failures always reach the collaborator
/// again on the next call.
pub struct CachedReputation {
    inner: Arc<dyn ReputationSource>,
    cache: Arc<dyn ResultCache<ReputationResult>>,
}

impl CachedReputation {
    pub fn new(
        inner: Arc<dyn ReputationSource>,
        cache: Arc<dyn ResultCache<ReputationResult>>,
    ) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl ReputationSource for CachedReputation {
    async fn fetch_reputation(&self, address: &str) -> Result<ReputationResult, CollaboratorError> {
        if let Some(hit) = self.cache.get(address) {
            tracing::debug!(address = %short_address(address), "Using cached reputation");
            counter!("cache_hits_total", "cache" => "reputation").increment(1);
            return Ok(hit);
        }

        let result = self.inner.fetch_reputation(address).await?;
        self.cache.set(address, result.clone());
        Ok(result)
    }
}

/// Sanctions checks behind the same TTL policy as reputation.
pub struct CachedSanctions {
    inner: Arc<dyn SanctionsSource>,
    cache: Arc<dyn ResultCache<SanctionsCheck>>,
}

impl CachedSanctions {
    pub fn new(
        inner: Arc<dyn SanctionsSource>,
        cache: Arc<dyn ResultCache<SanctionsCheck>>,
    ) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl SanctionsSource for CachedSanctions {
    async fn check_sanctions(&self, address: &str) -> Result<SanctionsCheck, CollaboratorError> {
        if let Some(hit) = self.cache.get(address) {
            tracing::debug!(address = %short_address(address), "Using cached sanctions check");
            counter!("cache_hits_total", "cache" => "sanctions").increment(1);
            return Ok(hit);
        }

        let result = self.inner.check_sanctions(address).await?;
        self.cache.set(address, result.clone());
        Ok(result)
    }
}
