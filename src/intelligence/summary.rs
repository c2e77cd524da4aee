use crate::models::{PrivacySummary, RiskFinding};

const FALLBACK_KEY_RISKS: usize = 3;

/// Qualitative band for a 0–100 privacy score.
pub fn privacy_band(score: u8) -> &'static str {
    if score > 75 {
        "STRONG"
    } else if score > 50 {
        "MODERATE"
    } else {
        "WEAK"
    }
}

/// Deterministic summary used when the summarizer does not answer.
/// `findings` must already be ranked.
pub fn fallback_summary(
    transaction_count: usize,
    unique_interactions: usize,
    findings: &[RiskFinding],
    score: u8,
) -> PrivacySummary {
    let verdict = match privacy_band(score) {
        "STRONG" => "Privacy appears strong with minimal exposure.",
        "MODERATE" => "Privacy is moderate with some identifiable patterns.",
        _ => "Privacy is weak with significant deanonymization risks.",
    };

    PrivacySummary {
        summary: format!(
            "This wallet has made {transaction_count} transactions with \
             {unique_interactions} unique addresses. {verdict}"
        ),
        key_risks: findings
            .iter()
            .take(FALLBACK_KEY_RISKS)
            .map(|f| f.title.clone())
            .collect(),
        recommendations: vec![
            "Use privacy-preserving protocols for future transfers".into(),
            "Avoid transacting with KYC exchanges directly".into(),
            "Randomize transaction timing to reduce temporal correlation".into(),
        ],
    }
}
