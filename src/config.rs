use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use crate::store::SubscriptionPlan;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub pricing: PricingConfig,
    #[serde(default)]
    pub marketplace: MarketplaceConfig,
    #[serde(default)]
    pub accounts: AccountsConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Synthetic,
    Remote,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    pub source: SourceKind,
    #[serde(default)]
    pub remote_url: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub cache_enabled: bool,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketplaceConfig {
    #[serde(default = "default_site_id")]
    pub site_id: String,
    #[serde(default = "default_listing_base_url")]
    pub listing_base_url: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AccountsConfig {
    #[serde(default)]
    pub default_plan: SubscriptionPlan,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default)]
    pub csv_logging: bool,
    #[serde(default = "default_csv_log_path")]
    pub csv_log_path: String,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            site_id: default_site_id(),
            listing_base_url: default_listing_base_url(),
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            csv_logging: false,
            csv_log_path: default_csv_log_path(),
        }
    }
}

fn default_request_timeout() -> u64 { 15 }
fn default_cache_ttl() -> u64 { 300 }
fn default_site_id() -> String { "EBAY_GB".to_string() }
fn default_listing_base_url() -> String { "https://www.ebay.co.uk".to_string() }
fn default_csv_log_path() -> String { "pricing_log.csv".to_string() }

#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub config_path: String,
    pub ebay_base: String,
    pub ebay_client_id: String,
    pub ebay_client_secret: String,
    pub ebay_redirect_uri: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;

        if config.pricing.source == SourceKind::Remote && config.pricing.remote_url.is_none() {
            anyhow::bail!("pricing.remote_url is required when pricing.source = \"remote\"");
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl EnvConfig {
    pub fn load() -> Self {
        dotenv::dotenv().ok();

        Self {
            config_path: std::env::var("LISTLIFT_CONFIG")
                .unwrap_or_else(|_| "config.toml".to_string()),
            ebay_base: std::env::var("EBAY_BASE")
                .unwrap_or_else(|_| "https://api.ebay.com".to_string()),
            ebay_client_id: std::env::var("EBAY_CLIENT_ID")
                .unwrap_or_else(|_| "test-client".to_string()),
            ebay_client_secret: std::env::var("EBAY_CLIENT_SECRET")
                .unwrap_or_else(|_| "test-secret".to_string()),
            ebay_redirect_uri: std::env::var("EBAY_REDIRECT_URI")
                .unwrap_or_else(|_| "listlift://auth".to_string()),
        }
    }
}
