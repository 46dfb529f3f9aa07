mod api;
mod config;
mod listing;
mod marketplace;
mod monitoring;
mod pricing;
mod store;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, EnvConfig, PricingConfig, SourceKind};
use pricing::cache::CachedSource;
use pricing::source::{RemoteSource, SyntheticSource};
use pricing::{ComparableSource, PricingAggregator};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,listlift_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("ListLift API starting...");

    let env_config = EnvConfig::load();
    tracing::info!("Loading configuration from {}", env_config.config_path);
    let config = Config::load(&env_config.config_path)?;

    let source = build_source(&config.pricing)?;
    tracing::info!(
        source = source.name(),
        cached = config.pricing.cache_enabled,
        "Comparable source ready"
    );

    let marketplace = marketplace::MarketplaceClient::new(&env_config, &config.marketplace);
    tracing::info!("Marketplace API base: {}", marketplace.api_base());

    let pricing_log = if config.monitoring.csv_logging {
        tracing::info!("Pricing CSV log: {}", config.monitoring.csv_log_path);
        Some(Arc::new(monitoring::PricingLog::new(config.monitoring.csv_log_path.clone())?))
    } else {
        None
    };

    let state = api::AppState {
        pricing: PricingAggregator::new(source),
        marketplace: Arc::new(marketplace),
        items: Arc::new(store::ItemStore::new()),
        accounts: Arc::new(store::AccountStore::new(config.accounts.default_plan)),
        pricing_log,
    };
    let app = api::build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    tracing::info!("✅ Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shutting down...");
    Ok(())
}

fn build_source(config: &PricingConfig) -> Result<Arc<dyn ComparableSource>> {
    let ttl = Duration::from_secs(config.cache_ttl_secs);

    let source: Arc<dyn ComparableSource> = match config.source {
        SourceKind::Synthetic => {
            let source = SyntheticSource::new();
            if config.cache_enabled {
                Arc::new(CachedSource::new(source, ttl))
            } else {
                Arc::new(source)
            }
        }
        SourceKind::Remote => {
            let url = config
                .remote_url
                .clone()
                .context("pricing.remote_url is not set")?;
            let source = RemoteSource::new(url, Duration::from_secs(config.request_timeout_secs))
                .context("Failed to build remote comparable source")?;
            if config.cache_enabled {
                Arc::new(CachedSource::new(source, ttl))
            } else {
                Arc::new(source)
            }
        }
    };

    Ok(source)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
