pub mod composer;
pub mod types;

pub use composer::generate_titles;
pub use types::{Aspect, ItemAttributes, ListingText};
