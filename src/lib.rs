pub mod api;
pub mod cache;
pub mod clients;
pub mod config;
pub mod errors;
pub mod intelligence;
pub mod metrics;
pub mod models;
pub mod services;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::PrivacyAnalyzer;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub analyzer: Arc<PrivacyAnalyzer>,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
