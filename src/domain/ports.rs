use crate::domain::model::{Lookup, ResolvedBusinessUnit, Review};
use crate::utils::error::{FetchError, ResolutionError};
use async_trait::async_trait;

#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, lookup: &Lookup) -> Result<ResolvedBusinessUnit, ResolutionError>;
}

#[async_trait]
pub trait ReviewTransport: Send + Sync {
    /// Fetches page `page_index` (1-based) of `page_size` reviews.
    async fn fetch_review_page(
        &self,
        business_unit_id: &str,
        page_index: u32,
        page_size: u32,
    ) -> Result<Vec<Review>, FetchError>;
}

/// Tuning knobs the aggregation needs, independent of where they were loaded from.
pub trait ConfigProvider: Send + Sync {
    fn review_cap(&self) -> usize;
    fn max_age_months(&self) -> u32;
}
