pub mod aggregator;
pub mod band;
pub mod cache;
pub mod source;
pub mod types;

pub use aggregator::PricingAggregator;
pub use source::{ComparableSource, SourceError};
