use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RiskLevel;

/// A flagged address found near the subject in the reputation graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaggedAddress {
    pub address: String,
    pub distance: u32,
    pub name_tag: String,
    pub entity: String,
    pub category: String,
}

/// Who the reputation service believes controls an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    pub name_tag: String,
    pub entity: String,
    pub category: String,
    pub address_role: String,
}

impl Attribution {
    /// True when the attribution points at a centralized exchange.
    pub fn is_exchange(&self) -> bool {
        let category = self.category.to_lowercase();
        let entity = self.entity.to_lowercase();
        category.contains("exchange") || category == "cex" || entity.contains("exchange")
    }
}

/// Address reputation, strongly typed at the adapter boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReputationResult {
    pub address: String,
    /// 0–10.
    pub risk_score: f64,
    pub risk_level: String,
    pub num_hops: u32,
    pub malicious_addresses_found: Vec<FlaggedAddress>,
    pub reasoning: String,
    pub attribution: Option<Attribution>,
}

impl ReputationResult {
    /// Score-of-zero default used whenever the collaborator cannot answer.
    pub fn unavailable(address: &str, reasoning: &str) -> Self {
        Self {
            address: address.to_string(),
            risk_score: 0.0,
            risk_level: "UNKNOWN".into(),
            num_hops: 0,
            malicious_addresses_found: Vec::new(),
            reasoning: reasoning.to_string(),
            attribution: None,
        }
    }

    /// Risk score rescaled from 0–10 to 0–100.
    pub fn normalized_score(&self) -> f64 {
        (self.risk_score * 10.0).clamp(0.0, 100.0)
    }

    pub fn level(&self) -> RiskLevel {
        RiskLevel::from_label(&self.risk_level)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanctionsAttribution {
    pub name: String,
    pub category: String,
    pub role: String,
    pub malicious: bool,
}

/// Sanctions and token-blacklist status of an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanctionsCheck {
    pub address: String,
    pub is_ofac_sanctioned: bool,
    pub is_token_blacklisted: bool,
    pub checked_at: DateTime<Utc>,
    pub attribution: Option<SanctionsAttribution>,
}

impl SanctionsCheck {
    pub fn clear(address: &str) -> Self {
        Self {
            address: address.to_string(),
            is_ofac_sanctioned: false,
            is_token_blacklisted: false,
            checked_at: Utc::now(),
            attribution: None,
        }
    }

    pub fn is_flagged(&self) -> bool {
        self.is_ofac_sanctioned || self.is_token_blacklisted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_score_clamps() {
        let mut rep = ReputationResult::unavailable("addr", "");
        rep.risk_score = 7.5;
        assert_eq!(rep.normalized_score(), 75.0);
        rep.risk_score = 12.0;
        assert_eq!(rep.normalized_score(), 100.0);
        rep.risk_score = -1.0;
        assert_eq!(rep.normalized_score(), 0.0);
    }

    #[test]
    fn test_attribution_is_exchange() {
        let attr = Attribution {
            name_tag: "Binance Hot Wallet".into(),
            entity: "Binance".into(),
            category: "Centralized Exchange".into(),
            address_role: "hot_wallet".into(),
        };
        assert!(attr.is_exchange());

        let attr = Attribution {
            category: "defi".into(),
            entity: "Jupiter".into(),
            ..attr
        };
        assert!(!attr.is_exchange());
    }

    #[test]
    fn test_sanctions_flagged() {
        let mut check = SanctionsCheck::clear("addr");
        assert!(!check.is_flagged());
        check.is_token_blacklisted = true;
        assert!(check.is_flagged());
    }
}
