use std::sync::Arc;
use tracing::{debug, info};
use crate::pricing::band::compute_band;
use crate::pricing::source::{ComparableSource, SourceError};
use crate::pricing::types::{ComparableQuery, PricingFilters, PricingSummary};

/// Fetches comparables and condenses them into a priced summary.
#[derive(Clone)]
pub struct PricingAggregator {
    source: Arc<dyn ComparableSource>,
}

impl PricingAggregator {
    pub fn new(source: Arc<dyn ComparableSource>) -> Self {
        Self { source }
    }

    /// One call to the source per invocation. Source failures propagate; an
    /// empty result is a valid summary carrying the zero band.
    pub async fn fetch_comparables(
        &self,
        brand: Option<String>,
        condition: &str,
        category_id: Option<String>,
        filters: PricingFilters,
    ) -> Result<PricingSummary, SourceError> {
        let query = ComparableQuery::new(brand, condition, category_id, filters);
        debug!(source = self.source.name(), ?query, "Fetching comparables");
        let items = self.source.fetch(&query).await?;

        let prices: Vec<f64> = items.iter().map(|listing| listing.price).collect();
        let price_band = compute_band(&prices);

        info!(
            source = self.source.name(),
            results = price_band.results_count,
            median = price_band.median,
            confidence = %price_band.confidence,
            "Priced comparables"
        );

        Ok(PricingSummary { items, price_band })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::pricing::source::SyntheticSource;
    use crate::pricing::types::{Confidence, Listing, PriceBand};

    struct StaticSource {
        listings: Vec<Listing>,
    }

    #[async_trait]
    impl ComparableSource for StaticSource {
        async fn fetch(&self, _query: &ComparableQuery) -> Result<Vec<Listing>, SourceError> {
            Ok(self.listings.clone())
        }

        fn name(&self) -> &'static str {
            "static"
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ComparableSource for FailingSource {
        async fn fetch(&self, _query: &ComparableQuery) -> Result<Vec<Listing>, SourceError> {
            Err(SourceError::Unavailable("connection refused".to_string()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    fn listing(id: &str, price: f64, marketplace: &str) -> Listing {
        Listing {
            id: id.to_string(),
            title: format!("Listing {}", id),
            price,
            currency: "GBP".to_string(),
            image_url: None,
            url: format!("https://example.test/{}", id),
            condition: "good".to_string(),
            seller_location: "UK".to_string(),
            shipping_cost: Some(3.5),
            marketplace: marketplace.to_string(),
        }
    }

    fn aggregator(listings: Vec<Listing>) -> PricingAggregator {
        PricingAggregator::new(Arc::new(StaticSource { listings }))
    }

    #[tokio::test]
    async fn test_empty_source_gives_zero_band() {
        let summary = aggregator(vec![])
            .fetch_comparables(None, "good", None, PricingFilters::default())
            .await
            .unwrap();

        assert!(summary.items.is_empty());
        assert_eq!(summary.price_band, PriceBand::empty());
    }

    #[tokio::test]
    async fn test_items_keep_source_order() {
        let listings = vec![listing("a", 50.0, "ebay"), listing("b", 10.0, "ebay"), listing("c", 30.0, "ebay")];
        let summary = aggregator(listings)
            .fetch_comparables(Some("Acme".to_string()), "good", None, PricingFilters::default())
            .await
            .unwrap();

        let ids: Vec<&str> = summary.items.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(summary.price_band.results_count, 3);
        assert_eq!(summary.price_band.median, 30.0);
    }

    #[tokio::test]
    async fn test_duplicate_prices_are_all_counted() {
        let listings = vec![listing("a", 20.0, "ebay"), listing("b", 20.0, "ebay"), listing("c", 20.0, "ebay")];
        let summary = aggregator(listings)
            .fetch_comparables(None, "good", None, PricingFilters::default())
            .await
            .unwrap();

        assert_eq!(summary.price_band.results_count, summary.items.len());
        assert_eq!(summary.price_band.results_count, 3);
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let aggregator = PricingAggregator::new(Arc::new(FailingSource));
        let result = aggregator
            .fetch_comparables(None, "good", None, PricingFilters::default())
            .await;

        assert!(matches!(result, Err(SourceError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_synthetic_source_summary() {
        let aggregator = PricingAggregator::new(Arc::new(SyntheticSource::new()));
        let summary = aggregator
            .fetch_comparables(None, "preOwned", None, PricingFilters::default())
            .await
            .unwrap();

        // prices are (30 + 2i) * 0.9 for i in 1..=15; the median is i = 8
        assert_eq!(summary.items.len(), 15);
        assert_eq!(summary.price_band.results_count, 15);
        assert!((summary.price_band.median - 41.4).abs() < 1e-9);
        assert_eq!(summary.price_band.confidence, Confidence::High);
        assert!(summary.price_band.suggested_min <= summary.price_band.suggested_max);
    }

    #[tokio::test]
    async fn test_concurrent_requests_are_independent() {
        let aggregator = PricingAggregator::new(Arc::new(SyntheticSource::new()));

        let requests = ["newWithTags", "good", "fair"].map(|condition| {
            let aggregator = aggregator.clone();
            async move {
                aggregator
                    .fetch_comparables(Some("Acme".to_string()), condition, None, PricingFilters::default())
                    .await
            }
        });
        let results = futures::future::join_all(requests).await;

        let medians: Vec<f64> = results
            .into_iter()
            .map(|r| r.unwrap().price_band.median)
            .collect();
        // (40 + 16) * 1.1 and (40 + 16) * 0.9
        assert!((medians[0] - 61.6).abs() < 1e-9);
        assert!((medians[1] - 50.4).abs() < 1e-9);
        assert!((medians[2] - 50.4).abs() < 1e-9);
    }
}
