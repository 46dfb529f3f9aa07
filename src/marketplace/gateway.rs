use chrono::{Duration, Utc};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;
use crate::config::{EnvConfig, MarketplaceConfig};
use crate::listing::types::Aspect;
use crate::marketplace::types::{
    CategorySuggestion, MarketplaceItem, OAuthToken, Order, PublishOffer, PublishResult, RefreshedToken,
};

const TOKEN_SCOPE: &str = "taxonomy.readonly inventory sell.account";
const ACCESS_TOKEN_TTL_SECS: u64 = 2 * 3600;
const REFRESH_TOKEN_TTL_SECS: u64 = 30 * 24 * 3600;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Item specifics missing")]
    MissingItemSpecifics,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Demo marketplace client. Answers every call locally with canned data.
#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    api_base: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    site_id: String,
    listing_base_url: String,
}

impl MarketplaceClient {
    pub fn new(env: &EnvConfig, config: &MarketplaceConfig) -> Self {
        Self {
            api_base: env.ebay_base.clone(),
            client_id: env.ebay_client_id.clone(),
            client_secret: env.ebay_client_secret.clone(),
            redirect_uri: env.ebay_redirect_uri.clone(),
            site_id: config.site_id.clone(),
            listing_base_url: config.listing_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Exchange an authorization code for a token pair
    pub async fn exchange_code(&self, code: &str) -> Result<OAuthToken, GatewayError> {
        if code.is_empty() {
            return Err(GatewayError::InvalidRequest("authorization code is empty".to_string()));
        }
        info!(
            client_id = %self.client_id,
            redirect_uri = %self.redirect_uri,
            has_secret = !self.client_secret.is_empty(),
            "Exchanging authorization code"
        );

        Ok(OAuthToken {
            access_token: "fake-access-token".to_string(),
            refresh_token: "fake-refresh-token".to_string(),
            expires_in: ACCESS_TOKEN_TTL_SECS,
            scope: TOKEN_SCOPE.to_string(),
            refresh_token_expires_in: REFRESH_TOKEN_TTL_SECS,
        })
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshedToken, GatewayError> {
        Ok(RefreshedToken {
            access_token: "fake-access-token".to_string(),
            refresh_token: refresh_token.to_string(),
            expires_at: Utc::now() + Duration::seconds(ACCESS_TOKEN_TTL_SECS as i64),
            scope: TOKEN_SCOPE.to_string(),
            site_id: self.site_id.clone(),
        })
    }

    pub async fn publish_listing(
        &self,
        item: &MarketplaceItem,
        offer: &PublishOffer,
    ) -> Result<PublishResult, GatewayError> {
        if item.aspects.is_empty() {
            warn!(item_id = %item.id, "Publish rejected: no item specifics");
            return Err(GatewayError::MissingItemSpecifics);
        }

        let listing_id = format!("EBAY-{}", item.id);
        info!(item_id = %item.id, %listing_id, price = offer.price, quantity = offer.quantity, "Listing published");

        Ok(PublishResult {
            listing_url: format!("{}/itm/{}", self.listing_base_url, listing_id),
            listing_id,
            status: "published".to_string(),
        })
    }

    pub async fn category_suggestions(&self, _item: &MarketplaceItem) -> Result<Vec<CategorySuggestion>, GatewayError> {
        Ok(vec![
            CategorySuggestion {
                category_id: "11450".to_string(),
                category_path: "Clothing > Dresses".to_string(),
                confidence: 0.82,
            },
            CategorySuggestion {
                category_id: "15724".to_string(),
                category_path: "Clothing > Tops".to_string(),
                confidence: 0.64,
            },
        ])
    }

    pub async fn item_specifics(&self, _category_id: &str) -> Result<Vec<Aspect>, GatewayError> {
        Ok(vec![
            Aspect {
                id: Uuid::from_u128(1),
                name: "Size".to_string(),
                value: String::new(),
                is_required: true,
                options: ["XS", "S", "M", "L", "XL"].map(String::from).to_vec(),
            },
            Aspect {
                id: Uuid::from_u128(2),
                name: "Colour".to_string(),
                value: String::new(),
                is_required: false,
                options: ["Black", "White", "Blue", "Red"].map(String::from).to_vec(),
            },
        ])
    }

    /// Parse a sale notification. Returns `None` for payloads that do not
    /// describe an order.
    pub fn parse_webhook(&self, payload: &Value) -> Option<Order> {
        let resource = payload.get("resource")?;
        let item_id = resource
            .get("itemId")
            .and_then(Value::as_str)
            .and_then(|id| Uuid::parse_str(id).ok())?;
        let order_id = resource.get("orderId").and_then(Value::as_str)?;

        Some(Order {
            item_id,
            order_id: order_id.to_string(),
            sold_at: Utc::now(),
        })
    }
}
