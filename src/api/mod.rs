//! HTTP boundary: routes, shared state and error mapping.

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::marketplace::MarketplaceClient;
use crate::monitoring::PricingLog;
use crate::pricing::PricingAggregator;
use crate::store::{AccountStore, ItemStore};

/// Service-scoped state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pricing: PricingAggregator,
    pub marketplace: Arc<MarketplaceClient>,
    pub items: Arc<ItemStore>,
    pub accounts: Arc<AccountStore>,
    pub pricing_log: Option<Arc<PricingLog>>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/pricing/comps", post(handlers::pricing_comps))
        .route("/api/titles/generate", post(handlers::generate))
        .route("/api/ebay/oauth/token", post(handlers::oauth_token))
        .route("/api/ebay/oauth/refresh", post(handlers::oauth_refresh))
        .route("/api/ebay/publish", post(handlers::publish))
        .route("/api/ebay/webhook", post(handlers::webhook))
        .route("/api/categories/suggest", post(handlers::suggest_categories))
        .route("/api/categories/:category_id/specifics", get(handlers::category_specifics))
        .route("/api/account/:user_id", get(handlers::account))
        .route("/api/account/:user_id/plan", put(handlers::change_plan))
        .route("/api/items/:item_id", get(handlers::item_status))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
