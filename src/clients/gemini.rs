use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::types::{GeminiResponse, RawSummaryPayload};
use super::{status_error, CollaboratorError, SummarizerOpinion, Summarizer, SummaryInput};
use crate::intelligence::summary::privacy_band;
use crate::models::PrivacySummary;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Natural-language summarizer backed by Gemini `generateContent`.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl Summarizer for GeminiClient {
    async fn summarize(&self, input: &SummaryInput) -> Result<SummarizerOpinion, CollaboratorError> {
        if self.api_key.is_empty() {
            return Err(CollaboratorError::NotConfigured("gemini"));
        }

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = json!({
            "contents": [{ "parts": [{ "text": build_prompt(input) }] }],
            "generationConfig": { "responseMimeType": "application/json" }
        });

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(status_error("gemini", resp.status()));
        }

        let text = resp.text().await?;
        let parsed: GeminiResponse = serde_json::from_str(&text)
            .map_err(|e| CollaboratorError::Malformed(format!("gemini envelope: {e}")))?;

        let content = parsed
            .first_text()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| CollaboratorError::Malformed("gemini returned no text".into()))?;

        parse_opinion(content)
    }
}

pub fn build_prompt(input: &SummaryInput) -> String {
    let risks = if input.findings.is_empty() {
        "None detected".to_string()
    } else {
        input
            .findings
            .iter()
            .map(|f| format!("{} - {}", f.severity, f.title))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut prompt = format!(
        "You are a blockchain privacy expert. Analyze this Solana wallet's privacy:\n\n\
         Wallet: {}\n\
         Transactions: {}\n\
         Unique Addresses Interacted With: {}\n\
         Detected Risks: {}\n\
         Calculated Privacy Score: {}/100 ({})\n",
        input.address,
        input.transaction_count,
        input.unique_interactions,
        risks,
        input.local_score,
        privacy_band(input.local_score),
    );

    if input.has_temporal_patterns {
        let hours = input
            .common_hours
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        prompt.push_str(&format!("Temporal Patterns: transactions clustered at hours {hours}\n"));
    }
    if input.reputation_score > 0.0 {
        prompt.push_str(&format!(
            "External Risk Score: {:.0}/100\n",
            input.reputation_score
        ));
    }

    prompt.push_str(
        "\nScore > 75 means strong privacy, 50-75 moderate, < 50 weak. \
         Keep privacyScore consistent with the calculated score unless the findings clearly justify otherwise.\n\n\
         Respond with JSON only:\n\
         {\"summary\": \"2-3 sentence plain-language summary\", \
         \"keyRisks\": [\"...\", \"...\", \"...\"], \
         \"recommendations\": [\"...\", \"...\", \"...\"], \
         \"privacyScore\": 0}\n",
    );

    prompt
}

/// Extract the JSON object between the first `{` and the last `}` and map it
/// into an opinion. Anything unparseable is `Malformed`.
pub fn parse_opinion(text: &str) -> Result<SummarizerOpinion, CollaboratorError> {
    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Err(CollaboratorError::Malformed("no JSON object in summary".into()));
    };
    if start >= end {
        return Err(CollaboratorError::Malformed("no JSON object in summary".into()));
    }

    let payload: RawSummaryPayload = serde_json::from_str(&text[start..=end])
        .map_err(|e| CollaboratorError::Malformed(format!("summary JSON: {e}")))?;

    let privacy_score = payload
        .privacy_score
        .filter(|s| s.is_finite())
        .map(|s| s.round().clamp(0.0, 100.0) as u8);

    Ok(SummarizerOpinion {
        summary: PrivacySummary {
            summary: payload
                .summary
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "Privacy analysis complete.".into()),
            key_risks: payload.key_risks.unwrap_or_default(),
            recommendations: payload.recommendations.unwrap_or_default(),
        },
        privacy_score,
    })
}
