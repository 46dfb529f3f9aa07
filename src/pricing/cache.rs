use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;
use crate::pricing::source::{ComparableSource, SourceError};
use crate::pricing::types::{ComparableQuery, Listing};

/// Entry count at which an insert first drops every expired entry.
const SWEEP_THRESHOLD: usize = 256;

/// Wraps a comparable source with a per-query TTL cache.
pub struct CachedSource<S> {
    inner: S,
    cache: DashMap<ComparableQuery, CachedListings>,
    ttl: Duration,
}

struct CachedListings {
    listings: Vec<Listing>,
    timestamp: Instant,
}

impl<S: ComparableSource> CachedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            cache: DashMap::new(),
            ttl,
        }
    }

    /// Get listings if not expired (evict on read)
    fn get(&self, query: &ComparableQuery) -> Option<Vec<Listing>> {
        let entry = self.cache.get(query)?;
        if entry.timestamp.elapsed() > self.ttl {
            drop(entry); // release the shard lock before removing
            self.cache.remove(query);
            None
        } else {
            Some(entry.listings.clone())
        }
    }

    fn insert(&self, query: &ComparableQuery, listings: Vec<Listing>) {
        // drop entries that expired without being read again
        if self.cache.len() >= SWEEP_THRESHOLD {
            let ttl = self.ttl;
            self.cache.retain(|_, entry| entry.timestamp.elapsed() <= ttl);
            debug!(remaining = self.cache.len(), "swept expired comparables");
        }

        self.cache.insert(
            query.clone(),
            CachedListings {
                listings,
                timestamp: Instant::now(),
            },
        );
    }
}

#[async_trait]
impl<S: ComparableSource> ComparableSource for CachedSource<S> {
    async fn fetch(&self, query: &ComparableQuery) -> Result<Vec<Listing>, SourceError> {
        if let Some(listings) = self.get(query) {
            debug!(source = self.inner.name(), count = listings.len(), "comparables cache hit");
            return Ok(listings);
        }

        let listings = self.inner.fetch(query).await?;
        self.insert(query, listings.clone());
        Ok(listings)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
