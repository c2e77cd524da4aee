use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{
    Attribution, FlaggedAddress, NativeTransfer, ReputationResult, SanctionsAttribution,
    SanctionsCheck, TokenTransfer, TransactionRecord,
};

// ---------------------------------------------------------------------------
// Enhanced transaction (Helius)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawNativeTransfer {
    pub from_user_account: Option<String>,
    pub to_user_account: Option<String>,
    pub amount: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawTokenAmount {
    /// Integer base units as a decimal string.
    pub token_amount: Option<String>,
    pub decimals: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawTokenTransfer {
    pub from_user_account: Option<String>,
    pub to_user_account: Option<String>,
    pub mint: Option<String>,
    /// UI amount, number or string depending on the endpoint version.
    pub token_amount: Option<Value>,
    pub raw_token_amount: Option<RawTokenAmount>,
}

impl RawTokenTransfer {
    /// Base-unit amount. Prefers the raw integer; when only the UI amount is
    /// present it is scaled by 10^9 so equal UI amounts stay equal.
    pub fn base_units(&self) -> u64 {
        if let Some(raw) = self
            .raw_token_amount
            .as_ref()
            .and_then(|r| r.token_amount.as_deref())
            .and_then(|s| s.parse::<u64>().ok())
        {
            return raw;
        }

        let ui = match &self.token_amount {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.parse::<f64>().ok(),
            _ => None,
        };

        match ui {
            Some(v) if v.is_finite() && v >= 0.0 => (v * 1e9).round() as u64,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawEnhancedTransaction {
    pub signature: Option<String>,
    pub timestamp: Option<i64>,
    #[serde(rename = "type")]
    pub tx_type: Option<String>,
    pub source: Option<String>,
    pub fee: Option<u64>,
    pub fee_payer: Option<String>,
    pub slot: Option<u64>,
    pub native_transfers: Option<Vec<RawNativeTransfer>>,
    pub token_transfers: Option<Vec<RawTokenTransfer>>,
}

impl RawEnhancedTransaction {
    pub fn into_record(self, subject: &str) -> TransactionRecord {
        TransactionRecord {
            signature: self.signature.unwrap_or_default(),
            timestamp: self.timestamp.unwrap_or(0),
            kind: self.tx_type.unwrap_or_else(|| "UNKNOWN".into()),
            source: self.source.unwrap_or_else(|| "UNKNOWN".into()),
            fee: self.fee.unwrap_or(0),
            fee_payer: self.fee_payer.unwrap_or_else(|| subject.to_string()),
            slot: self.slot.unwrap_or(0),
            native_transfers: self
                .native_transfers
                .unwrap_or_default()
                .into_iter()
                .map(|t| NativeTransfer {
                    from: t.from_user_account.unwrap_or_default(),
                    to: t.to_user_account.unwrap_or_default(),
                    amount: t.amount.unwrap_or(0),
                })
                .collect(),
            token_transfers: self
                .token_transfers
                .unwrap_or_default()
                .into_iter()
                .map(|t| {
                    let amount = t.base_units();
                    TokenTransfer {
                        from: t.from_user_account.unwrap_or_default(),
                        to: t.to_user_account.unwrap_or_default(),
                        mint: t.mint.unwrap_or_default(),
                        amount,
                    }
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Address risk (Range)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RawFlaggedAddress {
    pub address: Option<String>,
    pub distance: Option<u32>,
    pub name_tag: Option<String>,
    pub entity: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RawAttribution {
    pub name_tag: Option<String>,
    pub entity: Option<String>,
    pub category: Option<String>,
    pub address_role: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawAddressRisk {
    pub risk_score: Option<f64>,
    pub risk_level: Option<String>,
    pub num_hops: Option<u32>,
    pub malicious_addresses_found: Option<Vec<RawFlaggedAddress>>,
    pub reasoning: Option<String>,
    pub attribution: Option<RawAttribution>,
}

impl RawAddressRisk {
    pub fn into_result(self, address: &str) -> ReputationResult {
        ReputationResult {
            address: address.to_string(),
            risk_score: self
                .risk_score
                .filter(|s| s.is_finite())
                .map(|s| s.clamp(0.0, 10.0))
                .unwrap_or(0.0),
            risk_level: self.risk_level.unwrap_or_else(|| "LOW".into()),
            num_hops: self.num_hops.unwrap_or(0),
            malicious_addresses_found: self
                .malicious_addresses_found
                .unwrap_or_default()
                .into_iter()
                .map(|m| FlaggedAddress {
                    address: m.address.unwrap_or_default(),
                    distance: m.distance.unwrap_or(0),
                    name_tag: m.name_tag.unwrap_or_default(),
                    entity: m.entity.unwrap_or_default(),
                    category: m.category.unwrap_or_default(),
                })
                .collect(),
            reasoning: self.reasoning.unwrap_or_default(),
            attribution: self.attribution.map(|a| Attribution {
                name_tag: a.name_tag.unwrap_or_default(),
                entity: a.entity.unwrap_or_default(),
                category: a.category.unwrap_or_default(),
                address_role: a.address_role.unwrap_or_default(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RawSanctionsAttribution {
    pub name: Option<String>,
    pub category: Option<String>,
    pub role: Option<String>,
    pub malicious: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RawSanctions {
    pub is_token_blacklisted: Option<bool>,
    pub is_ofac_sanctioned: Option<bool>,
    pub checked_at: Option<String>,
    pub attribution: Option<RawSanctionsAttribution>,
}

impl RawSanctions {
    pub fn into_check(self, address: &str) -> SanctionsCheck {
        let checked_at = self
            .checked_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);

        SanctionsCheck {
            address: address.to_string(),
            is_ofac_sanctioned: self.is_ofac_sanctioned.unwrap_or(false),
            is_token_blacklisted: self.is_token_blacklisted.unwrap_or(false),
            checked_at,
            attribution: self.attribution.map(|a| SanctionsAttribution {
                name: a.name.unwrap_or_default(),
                category: a.category.unwrap_or_default(),
                role: a.role.unwrap_or_default(),
                malicious: a.malicious.unwrap_or(false),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// getTransaction (Solana JSON-RPC, jsonParsed encoding)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse<T> {
    #[serde(default)]
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<RpcError>,
}

/// Parsed account keys are objects; legacy encodings return bare strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RpcAccountKey {
    Parsed { pubkey: String },
    Plain(String),
}

impl RpcAccountKey {
    pub fn pubkey(&self) -> &str {
        match self {
            RpcAccountKey::Parsed { pubkey } => pubkey,
            RpcAccountKey::Plain(key) => key,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RpcMessage {
    pub account_keys: Vec<RpcAccountKey>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RpcInnerTransaction {
    pub message: RpcMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RpcTransactionMeta {
    pub pre_balances: Vec<u64>,
    pub post_balances: Vec<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RpcTransaction {
    pub meta: Option<RpcTransactionMeta>,
    pub transaction: RpcInnerTransaction,
}

// ---------------------------------------------------------------------------
// generateContent (Gemini)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeminiPart {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeminiContent {
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeminiCandidate {
    pub content: Option<GeminiContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeminiResponse {
    pub candidates: Vec<GeminiCandidate>,
}

impl GeminiResponse {
    /// Text of the first part of the first candidate, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.as_deref())
    }
}

/// The JSON object the summarizer is asked to produce.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawSummaryPayload {
    pub summary: Option<String>,
    pub key_risks: Option<Vec<String>>,
    pub recommendations: Option<Vec<String>>,
    pub privacy_score: Option<f64>,
}
