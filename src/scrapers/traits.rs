use crate::error::SourceError;
use crate::scrapers::types::{RawPage, SearchParams};
use async_trait::async_trait;

/// Common trait for listing sources.
///
/// One call is one attempt: implementations never retry, recovery belongs to the harvest loop.
#[async_trait]
pub trait ListingsSource: Send + Sync {
    /// Fetch a single page of raw search results
    async fn fetch(&self, params: &SearchParams, page: u32) -> Result<RawPage, SourceError>;

    /// Get the name of the listing source
    fn source_name(&self) -> &'static str;
}
