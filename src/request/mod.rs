pub mod client;

pub use client::MarketClient;

use async_trait::async_trait;

use crate::data::{CoinSnapshot, PriceHistoryPoint, SearchResult};
use crate::error::FetchError;

/// Anything that can answer the four market-data queries.
#[async_trait]
pub trait MarketSource: Send + Sync {
    async fn fetch_market_list(&self, limit: u32) -> Result<Vec<CoinSnapshot>, FetchError>;

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, FetchError>;

    async fn fetch_details(&self, id: &str) -> Result<Option<CoinSnapshot>, FetchError>;

    async fn fetch_price_history(
        &self,
        id: &str,
        days: u32,
    ) -> Result<Vec<PriceHistoryPoint>, FetchError>;
}
