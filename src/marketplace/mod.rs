pub mod gateway;
pub mod types;

pub use gateway::{GatewayError, MarketplaceClient};
pub use types::{CategorySuggestion, MarketplaceItem, OAuthToken, PublishOffer, PublishResult, RefreshedToken};
