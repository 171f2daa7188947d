use serde::{Deserialize, Serialize};

use crate::third_party::coingecko::api_path::COINGECKO_API_URL;

pub const VS_CURRENCY: &str = "usd";

pub const DEFAULT_MARKET_LIMIT: u32 = 100;
pub const SEARCH_UNIVERSE_LIMIT: u32 = 250;
pub const POPULAR_COUNT: usize = 10;
pub const DEFAULT_HISTORY_DAYS: u32 = 7;

pub const RECENT_SEARCHES_LIMIT: usize = 10;
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

// Storage keys
pub const WATCHLIST_KEY: &str = "crypto_watchlist";
pub const PORTFOLIO_KEY: &str = "crypto_portfolio";
pub const RECENT_SEARCHES_KEY: &str = "recent_searches";

/// Where the market client sends its requests and which fiat unit prices are quoted in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub vs_currency: String,
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: COINGECKO_API_URL.to_string(),
            vs_currency: VS_CURRENCY.to_string(),
        }
    }
}

/// Collection name to storage key mapping handed to the persistence store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreKeys {
    pub watchlist: String,
    pub portfolio: String,
    pub recent_searches: String,
}

impl StoreKeys {
    /// Same collections under a common prefix, e.g. one namespace per profile.
    pub fn prefixed(prefix: &str) -> Self {
        Self {
            watchlist: format!("{prefix}{WATCHLIST_KEY}"),
            portfolio: format!("{prefix}{PORTFOLIO_KEY}"),
            recent_searches: format!("{prefix}{RECENT_SEARCHES_KEY}"),
        }
    }
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self::prefixed("")
    }
}
