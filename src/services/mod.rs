pub mod analyzer;

pub use analyzer::{AnalyzerSettings, Collaborators, PrivacyAnalyzer};
