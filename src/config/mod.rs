use std::env;
use std::time::Duration;

use chrono::FixedOffset;

use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::clients::gemini::{DEFAULT_GEMINI_MODEL, GEMINI_API_BASE};
use crate::clients::helius::HELIUS_API_BASE;
use crate::clients::range::RANGE_API_BASE;
use crate::clients::solana_rpc::DEFAULT_RPC_URL;
use crate::services::AnalyzerSettings;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,

    // Collaborator endpoints and credentials (empty key = collaborator degrades)
    pub helius_api_key: String,
    pub helius_api_url: String,
    pub range_api_key: String,
    pub range_api_url: String,
    pub solana_rpc_url: String,
    pub gemini_api_key: String,
    pub gemini_api_url: String,
    pub gemini_model: String,

    // Pipeline tuning
    pub transaction_limit: usize,
    pub mev_sample_size: usize,
    pub exchange_lookup_limit: usize,
    pub collaborator_timeout_secs: u64,
    pub reputation_cache_ttl_secs: u64,
    pub reputation_cache_capacity: u64,
    pub analysis_utc_offset_hours: i32,
    pub extra_exchange_addresses: Vec<String>,

    // Optional bearer token guarding /api/*
    pub api_token: Option<String>,
    pub log_json: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let extra_exchange_addresses: Vec<String> = env::var("EXTRA_EXCHANGE_ADDRESSES")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let analysis_utc_offset_hours: i32 = env::var("ANALYSIS_UTC_OFFSET_HOURS")
            .unwrap_or_else(|_| "0".into())
            .parse()?;
        if !(-23..=23).contains(&analysis_utc_offset_hours) {
            anyhow::bail!("ANALYSIS_UTC_OFFSET_HOURS must be between -23 and 23");
        }

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,

            helius_api_key: env::var("HELIUS_API_KEY").unwrap_or_default(),
            helius_api_url: env::var("HELIUS_API_URL")
                .unwrap_or_else(|_| HELIUS_API_BASE.into()),
            range_api_key: env::var("RANGE_API_KEY").unwrap_or_default(),
            range_api_url: env::var("RANGE_API_URL").unwrap_or_else(|_| RANGE_API_BASE.into()),
            solana_rpc_url: env::var("SOLANA_RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.into()),
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            gemini_api_url: env::var("GEMINI_API_URL").unwrap_or_else(|_| GEMINI_API_BASE.into()),
            gemini_model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.into()),

            transaction_limit: env::var("TRANSACTION_LIMIT")
                .unwrap_or_else(|_| "100".into())
                .parse()
                .unwrap_or(100),
            mev_sample_size: env::var("MEV_SAMPLE_SIZE")
                .unwrap_or_else(|_| "20".into())
                .parse()
                .unwrap_or(20),
            exchange_lookup_limit: env::var("EXCHANGE_LOOKUP_LIMIT")
                .unwrap_or_else(|_| "20".into())
                .parse()
                .unwrap_or(20),
            collaborator_timeout_secs: env::var("COLLABORATOR_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".into())
                .parse()
                .unwrap_or(10),
            reputation_cache_ttl_secs: env::var("REPUTATION_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "60".into())
                .parse()
                .unwrap_or(60),
            reputation_cache_capacity: env::var("REPUTATION_CACHE_CAPACITY")
                .unwrap_or_else(|_| DEFAULT_CACHE_CAPACITY.to_string())
                .parse()
                .unwrap_or(DEFAULT_CACHE_CAPACITY),
            analysis_utc_offset_hours,
            extra_exchange_addresses,

            api_token: env::var("API_TOKEN").ok().filter(|t| !t.is_empty()),
            log_json: env::var("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }

    pub fn collaborator_timeout(&self) -> Duration {
        Duration::from_secs(self.collaborator_timeout_secs)
    }

    pub fn reputation_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.reputation_cache_ttl_secs)
    }

    /// Pipeline settings derived from this config.
    pub fn analyzer_settings(&self) -> anyhow::Result<AnalyzerSettings> {
        let utc_offset = FixedOffset::east_opt(self.analysis_utc_offset_hours * 3_600)
            .ok_or_else(|| anyhow::anyhow!("invalid UTC offset"))?;

        Ok(AnalyzerSettings {
            transaction_limit: self.transaction_limit,
            mev_sample_size: self.mev_sample_size,
            exchange_lookup_limit: self.exchange_lookup_limit,
            collaborator_timeout: self.collaborator_timeout(),
            utc_offset,
        })
    }

    pub fn has_summarizer(&self) -> bool {
        !self.gemini_api_key.is_empty()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            helius_api_key: String::new(),
            helius_api_url: HELIUS_API_BASE.into(),
            range_api_key: String::new(),
            range_api_url: RANGE_API_BASE.into(),
            solana_rpc_url: DEFAULT_RPC_URL.into(),
            gemini_api_key: String::new(),
            gemini_api_url: GEMINI_API_BASE.into(),
            gemini_model: DEFAULT_GEMINI_MODEL.into(),
            transaction_limit: 100,
            mev_sample_size: 20,
            exchange_lookup_limit: 20,
            collaborator_timeout_secs: 10,
            reputation_cache_ttl_secs: 60,
            reputation_cache_capacity: DEFAULT_CACHE_CAPACITY,
            analysis_utc_offset_hours: 0,
            extra_exchange_addresses: Vec::new(),
            api_token: None,
            log_json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppConfig::default().analyzer_settings().unwrap();
        assert_eq!(settings.transaction_limit, 100);
        assert_eq!(settings.mev_sample_size, 20);
        assert_eq!(settings.collaborator_timeout, Duration::from_secs(10));
        assert_eq!(settings.utc_offset.local_minus_utc(), 0);
    }

    #[test]
    fn test_offset_hours() {
        let config = AppConfig {
            analysis_utc_offset_hours: -5,
            ..AppConfig::default()
        };
        let settings = config.analyzer_settings().unwrap();
        assert_eq!(settings.utc_offset.local_minus_utc(), -5 * 3_600);
    }
}
