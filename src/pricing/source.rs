use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use uuid::Uuid;
use crate::pricing::types::{ComparableQuery, Listing};

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Comparable source unavailable: {0}")]
    Unavailable(String),

    #[error("Comparable source returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Supplies raw comparable listings for a query.
#[async_trait]
pub trait ComparableSource: Send + Sync {
    async fn fetch(&self, query: &ComparableQuery) -> Result<Vec<Listing>, SourceError>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Demo listings whose prices follow from the brand and condition selectors.
#[derive(Debug, Clone, Default)]
pub struct SyntheticSource;

impl SyntheticSource {
    const LISTING_COUNT: u32 = 15;
    const PREMIUM_CONDITION: &'static str = "newWithTags";

    pub fn new() -> Self {
        Self
    }

    fn base_price(query: &ComparableQuery) -> f64 {
        if query.brand.is_some() { 40.0 } else { 30.0 }
    }

    fn multiplier(query: &ComparableQuery) -> f64 {
        if query.condition == Self::PREMIUM_CONDITION { 1.1 } else { 0.9 }
    }
}

#[async_trait]
impl ComparableSource for SyntheticSource {
    async fn fetch(&self, query: &ComparableQuery) -> Result<Vec<Listing>, SourceError> {
        let base = Self::base_price(query);
        let multiplier = Self::multiplier(query);
        let label = query.brand.as_deref().unwrap_or("Item");

        Ok((1..=Self::LISTING_COUNT)
            .map(|i| Listing {
                id: Uuid::new_v4().to_string(),
                title: format!("{} #{}", label, i),
                price: (base + f64::from(i) * 2.0) * multiplier,
                currency: "GBP".to_string(),
                image_url: None,
                url: "https://www.ebay.co.uk/itm/demo".to_string(),
                condition: query.condition.clone(),
                seller_location: "UK".to_string(),
                shipping_cost: Some(0.0),
                marketplace: "ebay".to_string(),
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "synthetic"
    }
}

/// Comparables served by an HTTP snapshot service as a JSON array of listings.
pub struct RemoteSource {
    client: Client,
    base_url: String,
}

impl RemoteSource {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/comparables", self.base_url)
    }
}

#[async_trait]
impl ComparableSource for RemoteSource {
    async fn fetch(&self, query: &ComparableQuery) -> Result<Vec<Listing>, SourceError> {
        let response = self.client
            .get(self.endpoint())
            .query(&query.to_params())
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Unavailable(format!("HTTP {}", status)));
        }

        let listings = response
            .json::<Vec<Listing>>()
            .await
            .map_err(|e| SourceError::InvalidResponse(e.to_string()))?;

        validate_listings(&listings)?;
        Ok(listings)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

/// Prices and shipping costs must be non-negative amounts.
fn validate_listings(listings: &[Listing]) -> Result<(), SourceError> {
    for listing in listings {
        if !(listing.price.is_finite() && listing.price >= 0.0) {
            return Err(SourceError::InvalidResponse(format!(
                "listing {} has invalid price {}",
                listing.id, listing.price
            )));
        }

        if let Some(cost) = listing.shipping_cost {
            if !(cost.is_finite() && cost >= 0.0) {
                return Err(SourceError::InvalidResponse(format!(
                    "listing {} has invalid shipping cost {}",
                    listing.id, cost
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::types::PricingFilters;

    #[tokio::test]
    async fn test_synthetic_source_prices_by_brand_and_condition() {
        let source = SyntheticSource::new();

        let branded = ComparableQuery::new(Some("Acme".to_string()), "newWithTags", None, PricingFilters::default());
        let listings = source.fetch(&branded).await.unwrap();
        assert_eq!(listings.len(), 15);
        assert!((listings[0].price - 46.2).abs() < 1e-9); // (40 + 2) * 1.1
        assert_eq!(listings[0].title, "Acme #1");
        assert_eq!(listings[14].title, "Acme #15");

        let unbranded = ComparableQuery::new(None, "good", None, PricingFilters::default());
        let listings = source.fetch(&unbranded).await.unwrap();
        assert!((listings[0].price - 28.8).abs() < 1e-9); // (30 + 2) * 0.9
        assert_eq!(listings[0].title, "Item #1");
        assert_eq!(listings[0].condition, "good");
    }

    #[tokio::test]
    async fn test_synthetic_source_listing_ids_are_unique() {
        let source = SyntheticSource::new();
        let query = ComparableQuery::new(None, "fair", None, PricingFilters::default());
        let listings = source.fetch(&query).await.unwrap();

        let mut ids: Vec<&str> = listings.iter().map(|l| l.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), listings.len());
    }

    #[test]
    fn test_remote_endpoint_trims_trailing_slash() {
        let source = RemoteSource::new("http://comps.local/".to_string(), Duration::from_secs(1)).unwrap();
        assert_eq!(source.endpoint(), "http://comps.local/comparables");
    }

    /// Serves `body` at `/comparables` on an ephemeral port.
    async fn serve_snapshot(body: serde_json::Value) -> String {
        let app = axum::Router::new().route(
            "/comparables",
            axum::routing::get(move || async move { axum::Json(body) }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn snapshot_listing(price: f64, shipping_cost: f64) -> serde_json::Value {
        serde_json::json!({
            "id": "r-1",
            "title": "Acme jacket",
            "price": price,
            "currency": "GBP",
            "url": "https://www.ebay.co.uk/itm/1",
            "condition": "good",
            "sellerLocation": "UK",
            "shippingCost": shipping_cost,
            "marketplace": "ebay"
        })
    }

    fn remote(base_url: String) -> RemoteSource {
        RemoteSource::new(base_url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_remote_source_returns_snapshot() {
        let base = serve_snapshot(serde_json::json!([snapshot_listing(35.0, 0.0), snapshot_listing(0.0, 4.5)])).await;
        let query = ComparableQuery::new(Some("Acme".to_string()), "good", None, PricingFilters::default());

        let listings = remote(base).fetch(&query).await.unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].price, 35.0);
        assert_eq!(listings[1].shipping_cost, Some(4.5));
    }

    #[tokio::test]
    async fn test_remote_source_rejects_negative_price() {
        let base = serve_snapshot(serde_json::json!([snapshot_listing(35.0, 0.0), snapshot_listing(-50.0, 0.0)])).await;
        let query = ComparableQuery::new(None, "good", None, PricingFilters::default());

        let err = remote(base).fetch(&query).await.unwrap_err();
        assert!(matches!(err, SourceError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_remote_source_rejects_negative_shipping_cost() {
        let base = serve_snapshot(serde_json::json!([snapshot_listing(35.0, -1.0)])).await;
        let query = ComparableQuery::new(None, "good", None, PricingFilters::default());

        let err = remote(base).fetch(&query).await.unwrap_err();
        assert!(matches!(err, SourceError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_remote_source_error_status_is_unavailable() {
        let base = serve_snapshot(serde_json::json!([])).await;
        let query = ComparableQuery::new(None, "good", None, PricingFilters::default());

        let err = remote(format!("{}/missing", base)).fetch(&query).await.unwrap_err();
        assert!(matches!(err, SourceError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_remote_source_unreachable() {
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        let source = RemoteSource::new("http://127.0.0.1:9".to_string(), Duration::from_millis(500)).unwrap();
        let query = ComparableQuery::new(None, "good", None, PricingFilters::default());

        let err = source.fetch(&query).await.unwrap_err();
        assert!(matches!(err, SourceError::Unavailable(_)));
    }
}
