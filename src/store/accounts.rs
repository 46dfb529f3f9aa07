use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    #[default]
    Free,
    Pro,
    Power,
}

/// Limit reported for unlimited plans: the largest value a signed 64-bit
/// client integer can decode.
pub const UNLIMITED_LISTINGS: u64 = i64::MAX as u64;

impl SubscriptionPlan {
    /// Processed listings allowed per billing period
    pub fn listing_limit(&self) -> u64 {
        match self {
            SubscriptionPlan::Free => 10,
            SubscriptionPlan::Pro => 200,
            SubscriptionPlan::Power => UNLIMITED_LISTINGS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub user_id: Uuid,
    pub plan: SubscriptionPlan,
    pub processed_listings: u64,
    pub limit: u64,
}

impl AccountRecord {
    fn new(user_id: Uuid, plan: SubscriptionPlan) -> Self {
        Self {
            user_id,
            plan,
            processed_listings: 0,
            limit: plan.listing_limit(),
        }
    }

    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.processed_listings)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuotaError {
    #[error("Listing quota exceeded: {used} of {limit} used")]
    QuotaExceeded { used: u64, limit: u64 },
}

/// Per-account plan and usage counters.
#[derive(Debug, Default)]
pub struct AccountStore {
    records: DashMap<Uuid, AccountRecord>,
    default_plan: SubscriptionPlan,
}

impl AccountStore {
    pub fn new(default_plan: SubscriptionPlan) -> Self {
        Self {
            records: DashMap::new(),
            default_plan,
        }
    }

    /// Fetch the account, opening it on the default plan on first access.
    pub fn get(&self, user_id: Uuid) -> AccountRecord {
        self.records
            .entry(user_id)
            .or_insert_with(|| AccountRecord::new(user_id, self.default_plan))
            .clone()
    }

    /// Count a listing against the plan, checking and incrementing under the
    /// entry lock so concurrent callers cannot both take the last slot.
    pub fn track_processed_listing(&self, user_id: Uuid) -> Result<AccountRecord, QuotaError> {
        let mut record = self.records
            .entry(user_id)
            .or_insert_with(|| AccountRecord::new(user_id, self.default_plan));

        if record.processed_listings >= record.limit {
            warn!(%user_id, used = record.processed_listings, limit = record.limit, "Listing quota exceeded");
            return Err(QuotaError::QuotaExceeded {
                used: record.processed_listings,
                limit: record.limit,
            });
        }

        record.processed_listings += 1;
        Ok(record.clone())
    }

    /// Hand back a slot taken by `track_processed_listing` whose listing
    /// was never published.
    pub fn release_processed_listing(&self, user_id: Uuid) {
        if let Some(mut record) = self.records.get_mut(&user_id) {
            record.processed_listings = record.processed_listings.saturating_sub(1);
        }
    }

    /// Switch plans, keeping usage for the current period.
    pub fn set_plan(&self, user_id: Uuid, plan: SubscriptionPlan) -> AccountRecord {
        let mut record = self.records
            .entry(user_id)
            .or_insert_with(|| AccountRecord::new(user_id, self.default_plan));
        record.plan = plan;
        record.limit = plan.listing_limit();
        info!(%user_id, ?plan, "Account plan changed");
        record.clone()
    }
}
