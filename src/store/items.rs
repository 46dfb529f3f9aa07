use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Draft,
    Published,
    Sold,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub item_id: Uuid,
    pub listing_id: Option<String>,
    pub order_id: Option<String>,
    pub sold_at: Option<DateTime<Utc>>,
}

impl ItemRecord {
    fn new(item_id: Uuid) -> Self {
        Self {
            item_id,
            listing_id: None,
            order_id: None,
            sold_at: None,
        }
    }

    pub fn status(&self) -> ItemStatus {
        if self.sold_at.is_some() {
            ItemStatus::Sold
        } else if self.listing_id.is_some() {
            ItemStatus::Published
        } else {
            ItemStatus::Draft
        }
    }
}

/// Publish and sale state per item. Last write wins.
#[derive(Debug, Default)]
pub struct ItemStore {
    items: DashMap<Uuid, ItemRecord>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fresh publication, replacing any previous state.
    pub fn mark_published(&self, item_id: Uuid, listing_id: &str) {
        let mut record = ItemRecord::new(item_id);
        record.listing_id = Some(listing_id.to_string());
        self.items.insert(item_id, record);
        info!(%item_id, listing_id, "Item marked published");
    }

    pub fn mark_sold(&self, item_id: Uuid, order_id: &str, sold_at: DateTime<Utc>) {
        let mut record = self.items
            .entry(item_id)
            .or_insert_with(|| ItemRecord::new(item_id));
        record.order_id = Some(order_id.to_string());
        record.sold_at = Some(sold_at);
        info!(%item_id, order_id, "Item marked sold");
    }

    pub fn get(&self, item_id: Uuid) -> Option<ItemRecord> {
        self.items.get(&item_id).map(|entry| entry.clone())
    }
}
