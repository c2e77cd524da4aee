pub mod classifier;
pub mod detectors;
pub mod mev;
pub mod paths;
pub mod scorer;
pub mod summary;
pub mod temporal;

pub use classifier::{AddressClassifier, CounterpartyIntel, StaticDirectory};
pub use detectors::{run_detectors, DetectionContext, DetectorKind};
pub use mev::analyze_mev_exposure;
pub use paths::{build_paths, edge_confidence, MAX_PATHS};
pub use scorer::{local_privacy_score, rank_findings, resolve_score, ScoreInput};
pub use summary::fallback_summary;
pub use temporal::analyze_temporal_patterns;
