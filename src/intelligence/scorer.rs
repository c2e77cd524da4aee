use crate::models::{RiskFinding, ScoreSource};

const MAX_SCORE: f64 = 100.0;

/// Unique-interaction counts past which the exposure penalty applies.
const EXPOSURE_TIER_1: usize = 50;
const EXPOSURE_TIER_2: usize = 100;
const EXPOSURE_PENALTY: f64 = 10.0;

/// Weight applied to the 0–100 reputation score.
const REPUTATION_WEIGHT: f64 = 0.3;

/// Inputs to the deterministic local score.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    pub findings: &'a [RiskFinding],
    pub unique_interactions: usize,
    /// Reputation score on the collaborator's 0–10 scale.
    pub reputation_score: f64,
}

/// Compute the 0–100 privacy score from findings, exposure and reputation.
pub fn local_privacy_score(input: &ScoreInput<'_>) -> u8 {
    let mut score = MAX_SCORE;

    // ---------------------------------------------------------------------
    // Finding penalties
    // ---------------------------------------------------------------------
    for finding in input.findings {
        score -= finding.severity.score_penalty() as f64;
    }

    // ---------------------------------------------------------------------
    // Exposure penalty
    // ---------------------------------------------------------------------
    if input.unique_interactions > EXPOSURE_TIER_1 {
        score -= EXPOSURE_PENALTY;
    }
    if input.unique_interactions > EXPOSURE_TIER_2 {
        score -= EXPOSURE_PENALTY;
    }

    // ---------------------------------------------------------------------
    // Reputation penalty (0–10 rescaled to 0–100, then weighted)
    // ---------------------------------------------------------------------
    let reputation = if input.reputation_score.is_finite() {
        (input.reputation_score * 10.0).clamp(0.0, MAX_SCORE)
    } else {
        0.0
    };
    score -= reputation * REPUTATION_WEIGHT;

    score.round().clamp(0.0, MAX_SCORE) as u8
}

/// Stable sort by severity, critical first. Equal severities keep detector order.
pub fn rank_findings(findings: &mut [RiskFinding]) {
    findings.sort_by_key(|f| f.severity);
}

/// Pick the authoritative score: the summarizer's when it gave one, else the local one.
pub fn resolve_score(summarizer_score: Option<u8>, local_score: u8) -> (u8, ScoreSource) {
    match summarizer_score {
        Some(score) => (score.min(100), ScoreSource::Summarizer),
        None => (local_score, ScoreSource::Local),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskCategory, Severity};

    fn finding(id: &str, severity: Severity) -> RiskFinding {
        RiskFinding {
            id: id.into(),
            severity,
            title: id.into(),
            description: String::new(),
            confidence: 50,
            affected_transactions: 0,
            recommendation: String::new(),
            category: RiskCategory::Identity,
        }
    }

    fn score(findings: &[RiskFinding], unique: usize, reputation: f64) -> u8 {
        local_privacy_score(&ScoreInput {
            findings,
            unique_interactions: unique,
            reputation_score: reputation,
        })
    }

    #[test]
    fn test_clean_wallet_scores_100() {
        assert_eq!(score(&[], 0, 0.0), 100);
    }

    #[test]
    fn test_severity_penalties() {
        let findings = vec![
            finding("a", Severity::Critical),
            finding("b", Severity::High),
            finding("c", Severity::Medium),
            finding("d", Severity::Low),
        ];
        assert_eq!(score(&findings, 0, 0.0), 65);
    }

    #[test]
    fn test_exposure_tiers() {
        assert_eq!(score(&[], 50, 0.0), 100);
        assert_eq!(score(&[], 51, 0.0), 90);
        assert_eq!(score(&[], 101, 0.0), 80);
    }

    #[test]
    fn test_reputation_penalty_rounds() {
        // 100 - 5 * 10 * 0.3 = 85
        assert_eq!(score(&[], 0, 5.0), 85);
        // 100 - 3.3 * 10 * 0.3 = 90.1
        assert_eq!(score(&[], 0, 3.3), 90);
        assert_eq!(score(&[], 0, f64::NAN), 100);
    }

    #[test]
    fn test_score_floors_at_zero() {
        let findings: Vec<RiskFinding> = (0..10)
            .map(|i| finding(&i.to_string(), Severity::Critical))
            .collect();
        assert_eq!(score(&findings, 500, 10.0), 0);
    }

    #[test]
    fn test_rank_is_stable() {
        let mut findings = vec![
            finding("medium-1", Severity::Medium),
            finding("critical-1", Severity::Critical),
            finding("medium-2", Severity::Medium),
            finding("high", Severity::High),
            finding("critical-2", Severity::Critical),
        ];
        rank_findings(&mut findings);
        let ids: Vec<&str> = findings.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["critical-1", "critical-2", "high", "medium-1", "medium-2"]);
    }

    #[test]
    fn test_resolve_score_prefers_summarizer() {
        assert_eq!(resolve_score(Some(42), 90), (42, ScoreSource::Summarizer));
        assert_eq!(resolve_score(None, 90), (90, ScoreSource::Local));
    }
}
