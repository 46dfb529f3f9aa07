use serde::{Deserialize, Serialize};

/// A marketplace listing used as pricing evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub currency: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub url: String,
    pub condition: String,
    pub seller_location: String,
    #[serde(default)]
    pub shipping_cost: Option<f64>,
    pub marketplace: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Low => write!(f, "low"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBand {
    pub results_count: usize,
    pub median: f64,
    pub iqr: f64,
    pub suggested_min: f64,
    pub suggested_max: f64,
    pub confidence: Confidence,
}

impl PriceBand {
    /// Band returned when there is no pricing evidence at all.
    pub fn empty() -> Self {
        Self {
            results_count: 0,
            median: 0.0,
            iqr: 0.0,
            suggested_min: 0.0,
            suggested_max: 0.0,
            confidence: Confidence::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingSummary {
    pub items: Vec<Listing>,
    pub price_band: PriceBand,
}

impl PricingSummary {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShippingOption {
    Free,
    Paid,
}

impl ShippingOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShippingOption::Free => "free",
            ShippingOption::Paid => "paid",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingFilters {
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub shipping: Option<ShippingOption>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Selectors handed to a comparable source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ComparableQuery {
    pub brand: Option<String>,
    pub condition: String,
    pub category_id: Option<String>,
    pub filters: PricingFilters,
}

impl ComparableQuery {
    pub fn new(
        brand: Option<String>,
        condition: impl Into<String>,
        category_id: Option<String>,
        filters: PricingFilters,
    ) -> Self {
        Self {
            brand,
            condition: condition.into(),
            category_id,
            filters,
        }
    }

    /// Flatten the query into `(key, value)` pairs, skipping unset selectors.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(7);
        if let Some(brand) = &self.brand {
            params.push(("brand", brand.clone()));
        }
        params.push(("condition", self.condition.clone()));
        if let Some(category_id) = &self.category_id {
            params.push(("category_id", category_id.clone()));
        }
        if let Some(condition) = &self.filters.condition {
            params.push(("filter_condition", condition.clone()));
        }
        if let Some(size) = &self.filters.size {
            params.push(("size", size.clone()));
        }
        if let Some(shipping) = self.filters.shipping {
            params.push(("shipping", shipping.as_str().to_string()));
        }
        if let Some(location) = &self.filters.location {
            params.push(("location", location.clone()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_skip_unset_selectors() {
        let query = ComparableQuery::new(None, "preOwned", None, PricingFilters::default());
        assert_eq!(query.to_params(), vec![("condition", "preOwned".to_string())]);
    }

    #[test]
    fn test_query_params_include_filters() {
        let filters = PricingFilters {
            condition: None,
            size: Some("M".to_string()),
            shipping: Some(ShippingOption::Free),
            location: Some("UK".to_string()),
        };
        let query = ComparableQuery::new(Some("Acme".to_string()), "good", Some("11450".to_string()), filters);

        let params = query.to_params();
        assert_eq!(params[0], ("brand", "Acme".to_string()));
        assert!(params.contains(&("category_id", "11450".to_string())));
        assert!(params.contains(&("shipping", "free".to_string())));
        assert!(params.contains(&("location", "UK".to_string())));
    }

    #[test]
    fn test_band_serializes_camel_case() {
        let json = serde_json::to_value(PriceBand::empty()).unwrap();
        assert_eq!(json["resultsCount"], 0);
        assert_eq!(json["suggestedMin"], 0.0);
        assert_eq!(json["confidence"], "low");
    }
}
