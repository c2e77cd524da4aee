use std::time::Duration;

use tracing::debug;

use crate::clients::{guarded, MevSource};
use crate::models::{MevExposure, TransactionRecord};

/// Scan the first `sample_size` transactions for value extraction.
///
/// Calls are issued one at a time to stay under the collaborator's rate
/// limit. A failed or timed-out call counts as "not MEV" and the scan moves on.
pub async fn analyze_mev_exposure(
    source: &dyn MevSource,
    transactions: &[TransactionRecord],
    sample_size: usize,
    timeout: Duration,
) -> MevExposure {
    let mut exposure = MevExposure::default();

    for tx in transactions.iter().take(sample_size) {
        exposure.sampled += 1;

        let Some(detection) = guarded("mev", timeout, source.detect_mev(&tx.signature)).await else {
            continue;
        };

        if detection.is_mev {
            debug!(
                signature = %tx.signature,
                kind = ?detection.kind,
                extracted = detection.extracted_value,
                "MEV detected"
            );
            exposure.count += 1;
            exposure.total_extracted = exposure
                .total_extracted
                .saturating_add(detection.extracted_value);
        }
    }

    exposure.detected = exposure.count > 0;
    exposure
}
