use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::types::{RpcResponse, RpcTransaction};
use super::{status_error, CollaboratorError, MevDetection, MevKind, MevSource};

pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// 1 SOL in lamports; a single-account gain above this looks like a frontrun.
const FRONTRUN_GAIN_LAMPORTS: i128 = 1_000_000_000;

/// MEV detection over plain Solana JSON-RPC (QuickNode or any compatible
/// endpoint). Fetches the parsed transaction and inspects balance deltas.
#[derive(Debug, Clone)]
pub struct SolanaRpcClient {
    http: Client,
    rpc_url: String,
}

impl SolanaRpcClient {
    pub fn new(http: Client, rpc_url: impl Into<String>) -> Self {
        Self {
            http,
            rpc_url: rpc_url.into(),
        }
    }

    async fn get_transaction(&self, signature: &str) -> Result<Option<RpcTransaction>, CollaboratorError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getTransaction",
            "params": [
                signature,
                {
                    "encoding": "jsonParsed",
                    "commitment": "confirmed",
                    "maxSupportedTransactionVersion": 0
                }
            ]
        });

        let resp = self.http.post(&self.rpc_url).json(&body).send().await?;
        if !resp.status().is_success() {
            return Err(status_error("solana-rpc", resp.status()));
        }

        let text = resp.text().await?;
        let parsed: RpcResponse<RpcTransaction> = serde_json::from_str(&text)
            .map_err(|e| CollaboratorError::Malformed(format!("getTransaction: {e}")))?;

        if let Some(err) = parsed.error {
            return Err(CollaboratorError::Malformed(format!(
                "getTransaction error {}: {}",
                err.code, err.message
            )));
        }

        Ok(parsed.result)
    }
}

#[async_trait]
impl MevSource for SolanaRpcClient {
    async fn detect_mev(&self, signature: &str) -> Result<MevDetection, CollaboratorError> {
        let Some(tx) = self.get_transaction(signature).await? else {
            return Ok(MevDetection::none());
        };

        let keys: Vec<&str> = tx
            .transaction
            .message
            .account_keys
            .iter()
            .map(|k| k.pubkey())
            .collect();
        let meta = tx.meta.unwrap_or_default();

        Ok(analyze_balance_changes(&keys, &meta.pre_balances, &meta.post_balances))
    }
}

/// Classify a transaction from its per-account lamport deltas.
///
/// - **Sandwich**: first and last account are the same key and both gained.
/// - **Frontrun**: any account gained more than 1 SOL.
pub fn analyze_balance_changes(keys: &[&str], pre: &[u64], post: &[u64]) -> MevDetection {
    let changes: Vec<(&str, i128)> = keys
        .iter()
        .enumerate()
        .map(|(i, key)| {
            let before = pre.get(i).copied().unwrap_or(0) as i128;
            let after = post.get(i).copied().unwrap_or(0) as i128;
            (*key, after - before)
        })
        .collect();

    if let (Some(first), Some(last)) = (changes.first(), changes.last()) {
        if changes.len() > 1 && first.0 == last.0 && first.1 > 0 && last.1 > 0 {
            return MevDetection {
                is_mev: true,
                kind: Some(MevKind::Sandwich),
                extracted_value: clamp_lamports(first.1 + last.1),
                confidence: 85,
            };
        }
    }

    let largest_gain = changes
        .iter()
        .map(|(_, change)| *change)
        .filter(|change| *change > FRONTRUN_GAIN_LAMPORTS)
        .max();

    if let Some(gain) = largest_gain {
        return MevDetection {
            is_mev: true,
            kind: Some(MevKind::Frontrun),
            extracted_value: clamp_lamports(gain),
            confidence: 70,
        };
    }

    MevDetection::none()
}

fn clamp_lamports(value: i128) -> u64 {
    value.clamp(0, u64::MAX as i128) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sandwich_pattern() {
        let keys = ["bot", "victim", "pool", "bot"];
        let pre = [10, 100, 1_000, 10];
        let post = [15, 90, 1_000, 17];
        let mev = analyze_balance_changes(&keys, &pre, &post);
        assert!(mev.is_mev);
        assert_eq!(mev.kind, Some(MevKind::Sandwich));
        assert_eq!(mev.extracted_value, 12);
        assert_eq!(mev.confidence, 85);
    }

    #[test]
    fn test_frontrun_pattern() {
        let keys = ["payer", "searcher", "pool"];
        let pre = [5_000_000_000, 1_000_000_000, 0];
        let post = [2_000_000_000, 3_500_000_000, 0];
        let mev = analyze_balance_changes(&keys, &pre, &post);
        assert!(mev.is_mev);
        assert_eq!(mev.kind, Some(MevKind::Frontrun));
        assert_eq!(mev.extracted_value, 2_500_000_000);
    }

    #[test]
    fn test_plain_transfer_is_not_mev() {
        let keys = ["payer", "recipient", "system"];
        let pre = [2_000_000, 0, 1];
        let post = [995_000, 1_000_000, 1];
        let mev = analyze_balance_changes(&keys, &pre, &post);
        assert_eq!(mev, MevDetection::none());
    }

    #[test]
    fn test_single_account_is_not_sandwich() {
        let mev = analyze_balance_changes(&["solo"], &[1], &[2]);
        assert!(!mev.is_mev);
    }

    #[test]
    fn test_missing_balances_are_tolerated() {
        let mev = analyze_balance_changes(&["a", "b"], &[], &[]);
        assert!(!mev.is_mev);
    }
}
