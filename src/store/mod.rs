pub mod accounts;
pub mod items;

pub use accounts::{AccountRecord, AccountStore, QuotaError, SubscriptionPlan};
pub use items::{ItemRecord, ItemStatus, ItemStore};
