use super::classifier::{AddressClassifier, CounterpartyIntel};
use crate::models::{Counterparties, DeanonymizationPath, NodeKind, PathEdge, PathNode, RiskLevel};

/// Upper bound on paths per analysis, whatever the counterparty count.
pub const MAX_PATHS: usize = 10;

const BASE_EDGE_CONFIDENCE: usize = 40;
const EDGE_CONFIDENCE_PER_TX: usize = 5;
const MAX_EDGE_CONFIDENCE: usize = 95;

/// A wallet counterparty seen in more transactions than this is medium risk.
const ACTIVE_WALLET_TX_THRESHOLD: usize = 3;

/// Confidence that a direct edge links two controllers, from repeated contact.
pub fn edge_confidence(tx_count: usize) -> u8 {
    BASE_EDGE_CONFIDENCE
        .saturating_add(EDGE_CONFIDENCE_PER_TX.saturating_mul(tx_count))
        .min(MAX_EDGE_CONFIDENCE) as u8
}

/// Node risk: reputation intel wins, otherwise infer from kind and activity.
fn node_risk(kind: NodeKind, tx_count: usize, known: Option<RiskLevel>) -> RiskLevel {
    if let Some(level) = known {
        return level;
    }
    match kind {
        NodeKind::Exchange => RiskLevel::High,
        NodeKind::Program => RiskLevel::Low,
        NodeKind::Wallet if tx_count > ACTIVE_WALLET_TX_THRESHOLD => RiskLevel::Medium,
        NodeKind::Wallet => RiskLevel::Low,
    }
}

/// Build up to [`MAX_PATHS`] one-hop paths from the subject to its most
/// active counterparties. With no counterparties the result is a single
/// path holding only the subject.
pub fn build_paths(
    subject: &str,
    counterparties: &Counterparties,
    classifier: &dyn AddressClassifier,
    intel: &CounterpartyIntel,
) -> Vec<DeanonymizationPath> {
    let subject_node = PathNode {
        address: subject.to_string(),
        kind: NodeKind::Wallet,
        risk: RiskLevel::Low,
        tx_count: None,
    };

    if counterparties.is_empty() {
        return vec![DeanonymizationPath {
            nodes: vec![subject_node],
            edges: Vec::new(),
        }];
    }

    counterparties
        .most_active(MAX_PATHS)
        .into_iter()
        .map(|(address, tx_count)| {
            let kind = if intel.is_exchange(address) {
                NodeKind::Exchange
            } else {
                classifier.classify(address)
            };

            DeanonymizationPath {
                nodes: vec![
                    subject_node.clone(),
                    PathNode {
                        address: address.to_string(),
                        kind,
                        risk: node_risk(kind, tx_count, intel.risk_level(address)),
                        tx_count: Some(tx_count),
                    },
                ],
                edges: vec![PathEdge {
                    from: subject.to_string(),
                    to: address.to_string(),
                    confidence: edge_confidence(tx_count),
                }],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::classifier::StaticDirectory;
    use crate::models::{NativeTransfer, TransactionRecord};

    const SUBJECT: &str = "Subject";

    fn tx(sig: &str, to: &str) -> TransactionRecord {
        TransactionRecord {
            signature: sig.into(),
            timestamp: 0,
            kind: "TRANSFER".into(),
            source: "SYSTEM_PROGRAM".into(),
            fee: 0,
            fee_payer: SUBJECT.into(),
            slot: 0,
            native_transfers: vec![NativeTransfer {
                from: SUBJECT.into(),
                to: to.into(),
                amount: 1,
            }],
            token_transfers: vec![],
        }
    }

    #[test]
    fn test_edge_confidence() {
        assert_eq!(edge_confidence(0), 40);
        assert_eq!(edge_confidence(1), 45);
        assert_eq!(edge_confidence(11), 95);
        assert_eq!(edge_confidence(usize::MAX), 95);
    }

    #[test]
    fn test_empty_counterparties_yield_subject_only_path() {
        let paths = build_paths(
            SUBJECT,
            &Counterparties::default(),
            &StaticDirectory::default(),
            &CounterpartyIntel::default(),
        );
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes.len(), 1);
        assert_eq!(paths[0].nodes[0].address, SUBJECT);
        assert!(paths[0].edges.is_empty());
    }

    #[test]
    fn test_paths_are_bounded_and_ranked() {
        let mut txs = Vec::new();
        for peer in 0..40 {
            // Peer39 gets the most transactions
            for n in 0..=(peer / 10) {
                txs.push(tx(&format!("{peer}-{n}"), &format!("Peer{peer:02}")));
            }
        }
        let counterparties = Counterparties::derive(SUBJECT, &txs);
        assert_eq!(counterparties.len(), 40);

        let paths = build_paths(
            SUBJECT,
            &counterparties,
            &StaticDirectory::default(),
            &CounterpartyIntel::default(),
        );
        assert_eq!(paths.len(), MAX_PATHS);
        assert_eq!(paths[0].nodes[1].address, "Peer30");
        assert_eq!(paths[0].nodes[1].tx_count, Some(4));
        assert_eq!(paths[0].nodes[1].risk, RiskLevel::Medium);
        assert_eq!(paths[0].edges[0].confidence, 60);
        for path in &paths {
            assert_eq!(path.nodes.len(), 2);
            assert_eq!(path.edges.len(), 1);
        }
    }

    #[test]
    fn test_node_kind_and_risk() {
        let txs = vec![
            tx("a", "5tzFkiKscXHK5ZXCGbXZxdw7gTjjD1mBwuoFbhUvuAi9"),
            tx("b", "11111111111111111111111111111111"),
            tx("c", "Flagged"),
            tx("d", "AttributedCex"),
        ];
        let counterparties = Counterparties::derive(SUBJECT, &txs);
        let mut intel = CounterpartyIntel::default();
        intel.risk_levels.insert("Flagged".into(), RiskLevel::Critical);
        intel.exchanges.insert("AttributedCex".into());

        let paths = build_paths(SUBJECT, &counterparties, &StaticDirectory::default(), &intel);
        let node = |addr: &str| {
            paths
                .iter()
                .map(|p| &p.nodes[1])
                .find(|n| n.address == addr)
                .cloned()
                .unwrap()
        };

        let cex = node("5tzFkiKscXHK5ZXCGbXZxdw7gTjjD1mBwuoFbhUvuAi9");
        assert_eq!((cex.kind, cex.risk), (NodeKind::Exchange, RiskLevel::High));
        let program = node("11111111111111111111111111111111");
        assert_eq!((program.kind, program.risk), (NodeKind::Program, RiskLevel::Low));
        let flagged = node("Flagged");
        assert_eq!((flagged.kind, flagged.risk), (NodeKind::Wallet, RiskLevel::Critical));
        let attributed = node("AttributedCex");
        assert_eq!(attributed.kind, NodeKind::Exchange);
    }
}
