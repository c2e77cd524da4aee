use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::ApiResponse;
use crate::errors::AppError;
use crate::models::{short_address, WalletAnalysis};
use crate::AppState;

/// Solana public keys are 32 bytes, 32–44 base58 characters.
const PUBKEY_LEN: usize = 32;
const MIN_ADDRESS_CHARS: usize = 32;
const MAX_ADDRESS_CHARS: usize = 44;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub address: Option<String>,
}

/// Whether `address` is a base58-encoded 32-byte public key.
pub fn is_valid_solana_address(address: &str) -> bool {
    if !(MIN_ADDRESS_CHARS..=MAX_ADDRESS_CHARS).contains(&address.len()) {
        return false;
    }
    matches!(bs58::decode(address).into_vec(), Ok(bytes) if bytes.len() == PUBKEY_LEN)
}

/// POST /api/analyze: Run the privacy pipeline for one address.
pub async fn analyze(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ApiResponse<WalletAnalysis>>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::BadRequest("Request body is empty".into()));
    }

    let request: AnalyzeRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?;

    let address = request
        .address
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .ok_or_else(|| AppError::BadRequest("Wallet address is required".into()))?;

    if !is_valid_solana_address(&address) {
        tracing::debug!(address = %short_address(&address), "Rejected invalid address");
        return Err(AppError::InvalidAddress(address));
    }

    let analysis = state.analyzer.analyze(&address).await;
    Ok(Json(ApiResponse::ok(analysis)))
}

/// GET /api/analyze: Usage hint.
pub async fn usage() -> Json<Value> {
    Json(json!({
        "message": "Send a POST request with a wallet address to analyze",
        "example": { "address": "YourSolanaWalletAddress" },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_validation() {
        assert!(is_valid_solana_address("11111111111111111111111111111111"));
        assert!(is_valid_solana_address(
            "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"
        ));
        assert!(!is_valid_solana_address(""));
        assert!(!is_valid_solana_address("not-a-wallet"));
        // '0', 'O', 'I' and 'l' are outside the base58 alphabet
        assert!(!is_valid_solana_address(
            "0OIl1111111111111111111111111111111111111111"
        ));
        // Valid base58 but decodes to 33 bytes
        assert!(!is_valid_solana_address(
            "zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz"
        ));
    }
}
