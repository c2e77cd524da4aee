use std::sync::Arc;

use echo_privacy::api::create_router;
use echo_privacy::cache::TtlCache;
use echo_privacy::clients::{
    CachedReputation, CachedSanctions, GeminiClient, HeliusClient, RangeClient, SolanaRpcClient,
};
use echo_privacy::config::AppConfig;
use echo_privacy::intelligence::StaticDirectory;
use echo_privacy::metrics::init_metrics;
use echo_privacy::models::{ReputationResult, SanctionsCheck};
use echo_privacy::services::{Collaborators, PrivacyAnalyzer};
use echo_privacy::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.log_json);

    let addr = format!("{}:{}", config.host, config.port);
    let metrics_handle = init_metrics()?;

    if config.helius_api_key.is_empty() {
        tracing::warn!("HELIUS_API_KEY is not set, transaction history will be empty");
    }
    if config.range_api_key.is_empty() {
        tracing::warn!("RANGE_API_KEY is not set, reputation and sanctions will use defaults");
    }
    if !config.has_summarizer() {
        tracing::warn!("GEMINI_API_KEY is not set, summaries fall back to the local template");
    }

    let analyzer = build_analyzer(&config)?;

    tracing::info!(
        transaction_limit = config.transaction_limit,
        mev_sample_size = config.mev_sample_size,
        cache_ttl_secs = config.reputation_cache_ttl_secs,
        auth_enabled = config.api_token.is_some(),
        "Privacy analyzer ready"
    );

    let state = AppState {
        config,
        analyzer: Arc::new(analyzer),
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wire the HTTP adapters, caches and classifier into one analyzer.
fn build_analyzer(config: &AppConfig) -> anyhow::Result<PrivacyAnalyzer> {
    let http = reqwest::Client::builder()
        .timeout(config.collaborator_timeout())
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let range = Arc::new(RangeClient::new(
        http.clone(),
        &config.range_api_url,
        &config.range_api_key,
    ));
    let ttl = config.reputation_cache_ttl();
    let capacity = config.reputation_cache_capacity;

    let collaborators = Collaborators {
        ledger: Arc::new(HeliusClient::new(
            http.clone(),
            &config.helius_api_url,
            &config.helius_api_key,
        )),
        reputation: Arc::new(CachedReputation::new(
            range.clone(),
            Arc::new(TtlCache::<ReputationResult>::with_capacity(ttl, capacity)),
        )),
        sanctions: Arc::new(CachedSanctions::new(
            range,
            Arc::new(TtlCache::<SanctionsCheck>::with_capacity(ttl, capacity)),
        )),
        mev: Arc::new(SolanaRpcClient::new(http.clone(), &config.solana_rpc_url)),
        summarizer: Arc::new(GeminiClient::new(
            http,
            &config.gemini_api_url,
            &config.gemini_api_key,
            &config.gemini_model,
        )),
    };

    let classifier =
        StaticDirectory::default().with_exchanges(config.extra_exchange_addresses.iter().cloned());

    Ok(PrivacyAnalyzer::new(
        collaborators,
        Arc::new(classifier),
        config.analyzer_settings()?,
    ))
}

fn init_tracing(json: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
