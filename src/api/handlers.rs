use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;
use crate::api::error::ApiError;
use crate::api::AppState;
use crate::listing::{generate_titles, Aspect, ItemAttributes, ListingText};
use crate::marketplace::{
    CategorySuggestion, MarketplaceItem, OAuthToken, PublishOffer, PublishResult, RefreshedToken,
};
use crate::pricing::types::{PricingFilters, PricingSummary};
use crate::store::{AccountRecord, ItemRecord, ItemStatus, SubscriptionPlan};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: DateTime<Utc>,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRequest {
    pub item_id: Uuid,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    pub condition: String,
    #[serde(default)]
    pub filters: PricingFilters,
}

pub async fn pricing_comps(
    State(state): State<AppState>,
    Json(request): Json<PricingRequest>,
) -> Result<Json<PricingSummary>, ApiError> {
    let PricingRequest { item_id, brand, category_id, condition, filters } = request;
    let brand = brand.or_else(|| filters.size.clone());

    let summary = state.pricing
        .fetch_comparables(brand.clone(), &condition, category_id.clone(), filters)
        .await?;

    if let Some(log) = state.pricing_log.clone() {
        let band = summary.price_band.clone();
        let written = tokio::task::spawn_blocking(move || {
            log.log_band(brand.as_deref(), &condition, category_id.as_deref(), &band)
        })
        .await
        .map_err(anyhow::Error::from)
        .and_then(|result| result);

        if let Err(e) = written {
            warn!(error = %e, "Failed to write pricing log");
        }
    }

    if summary.is_empty() {
        info!(%item_id, "No comparables found");
        return Err(ApiError::NotFound("No comparables found".to_string()));
    }

    Ok(Json(summary))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleRequest {
    pub item_id: Uuid,
    pub tone: String,
    pub brand: String,
    pub size: String,
    pub material: String,
    pub condition: String,
    #[serde(default)]
    pub aspects: Vec<Aspect>,
}

pub async fn generate(Json(request): Json<TitleRequest>) -> Json<Vec<ListingText>> {
    let attributes = ItemAttributes {
        brand: request.brand,
        size: request.size,
        material: request.material,
        condition: request.condition,
        aspects: request.aspects,
    };
    let texts = generate_titles(&attributes, &request.tone);
    info!(item_id = %request.item_id, tone = %request.tone, count = texts.len(), "Generated titles");
    Json(texts)
}

#[derive(Debug, Deserialize)]
pub struct OAuthTokenRequest {
    pub code: String,
}

pub async fn oauth_token(
    State(state): State<AppState>,
    Json(request): Json<OAuthTokenRequest>,
) -> Result<Json<OAuthToken>, ApiError> {
    Ok(Json(state.marketplace.exchange_code(&request.code).await?))
}

#[derive(Debug, Deserialize)]
pub struct OAuthRefreshRequest {
    pub refresh_token: String,
}

pub async fn oauth_refresh(
    State(state): State<AppState>,
    Json(request): Json<OAuthRefreshRequest>,
) -> Result<Json<RefreshedToken>, ApiError> {
    Ok(Json(state.marketplace.refresh_token(&request.refresh_token).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub item: MarketplaceItem,
    pub offer: PublishOffer,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

pub async fn publish(
    State(state): State<AppState>,
    Json(request): Json<PublishRequest>,
) -> Result<Json<PublishResult>, ApiError> {
    // the quota slot is taken before publishing and handed back on failure
    if let Some(user_id) = request.user_id {
        state.accounts.track_processed_listing(user_id)?;
    }

    let result = match state.marketplace.publish_listing(&request.item, &request.offer).await {
        Ok(result) => result,
        Err(e) => {
            if let Some(user_id) = request.user_id {
                state.accounts.release_processed_listing(user_id);
            }
            return Err(e.into());
        }
    };
    state.items.mark_published(request.item.id, &result.listing_id);

    Ok(Json(result))
}

pub async fn suggest_categories(
    State(state): State<AppState>,
    Json(item): Json<MarketplaceItem>,
) -> Result<Json<Vec<CategorySuggestion>>, ApiError> {
    Ok(Json(state.marketplace.category_suggestions(&item).await?))
}

pub async fn category_specifics(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> Result<Json<Vec<Aspect>>, ApiError> {
    Ok(Json(state.marketplace.item_specifics(&category_id).await?))
}

pub async fn webhook(State(state): State<AppState>, Json(payload): Json<Value>) -> Json<Value> {
    match state.marketplace.parse_webhook(&payload) {
        Some(order) => state.items.mark_sold(order.item_id, &order.order_id, order.sold_at),
        None => warn!("Ignoring webhook without an order"),
    }
    Json(json!({ "status": "accepted" }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPlanResponse {
    pub plan: SubscriptionPlan,
    pub processed_listings: u64,
    pub processed_listings_limit: u64,
    pub remaining: u64,
}

impl From<AccountRecord> for AccountPlanResponse {
    fn from(record: AccountRecord) -> Self {
        Self {
            plan: record.plan,
            processed_listings: record.processed_listings,
            processed_listings_limit: record.limit,
            remaining: record.remaining(),
        }
    }
}

pub async fn account(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Json<AccountPlanResponse> {
    Json(state.accounts.get(user_id).into())
}

#[derive(Debug, Deserialize)]
pub struct PlanChangeRequest {
    pub plan: SubscriptionPlan,
}

pub async fn change_plan(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<PlanChangeRequest>,
) -> Json<AccountPlanResponse> {
    Json(state.accounts.set_plan(user_id, request.plan).into())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStatusResponse {
    #[serde(flatten)]
    pub record: ItemRecord,
    pub status: ItemStatus,
}

pub async fn item_status(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<ItemStatusResponse>, ApiError> {
    let record = state.items
        .get(item_id)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown item {}", item_id)))?;
    let status = record.status();
    Ok(Json(ItemStatusResponse { record, status }))
}
