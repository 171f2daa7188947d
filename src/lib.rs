//! Coin market client
//!
//! Fetches CoinGecko market data, filters and sorts it client-side, and keeps
//! a watchlist, a manually entered portfolio and recent searches in a
//! key-value store.

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod query;
pub mod request;
pub mod storage;
pub mod third_party;

pub use app::{App, CoinDetail, PortfolioView, SearchOutcome, SearchSession, WatchlistView};
pub use config::{ClientConfig, StoreKeys};
pub use data::{
    CoinSnapshot, HoldingUpdate, PortfolioHolding, PortfolioTotals, PriceHistoryPoint,
    SearchResult, WatchlistEntry, WatchlistStats,
};
pub use error::{AppError, FetchError, StoreError};
pub use query::{Query, SortDirection, SortKey, filter_by_substring, sort};
pub use request::{MarketClient, MarketSource};
pub use storage::{KeyValueStore, MemoryStore, PersistenceStore, SledStore};
