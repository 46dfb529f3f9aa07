pub mod logger;

pub use logger::PricingLog;
