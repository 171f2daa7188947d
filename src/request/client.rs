use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::MarketSource;
use crate::config::ClientConfig;
use crate::data::{CoinSnapshot, PriceHistoryPoint, SearchResult, history_from_chart};
use crate::error::FetchError;
use crate::third_party::coingecko::api_path::{
    COINGECKO_COINS_PATH, COINGECKO_MARKET_CHART_PATH, COINGECKO_MARKETS_PATH,
    COINGECKO_SEARCH_PATH,
};
use crate::third_party::coingecko::data::{
    CoinDetailResponse, MarketChartResponse, MarketCoin, SearchResponse,
};

/// Single-shot CoinGecko client: no retry, no cache, transport default timeouts.
#[derive(Debug, Clone)]
pub struct MarketClient {
    http: Client,
    config: ClientConfig,
}

impl MarketClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_http(Client::new(), config)
    }

    pub fn with_http(http: Client, config: ClientConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        debug!("GET {} {:?}", url, query);

        let response = self
            .http
            .get(&url)
            .header("accept", "application/json")
            .query(query)
            .send()
            .await
            .inspect_err(|e| warn!("Request to {} failed: {}", url, e))?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!("{} answered HTTP {}", url, status.as_u16());
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!("Could not decode response from {}: {}", url, e);
            FetchError::Decode(e)
        })
    }

    /// Top `limit` coins by market capitalization, in provider order.
    pub async fn fetch_market_list(&self, limit: u32) -> Result<Vec<CoinSnapshot>, FetchError> {
        if limit == 0 {
            return Err(FetchError::InvalidRequest("limit must be positive".to_string()));
        }

        let raw: Vec<MarketCoin> = self
            .get_json(
                COINGECKO_MARKETS_PATH,
                &[
                    ("vs_currency", self.config.vs_currency.clone()),
                    ("order", "market_cap_desc".to_string()),
                    ("per_page", limit.to_string()),
                    ("page", "1".to_string()),
                    ("sparkline", "true".to_string()),
                    ("price_change_percentage", "24h".to_string()),
                ],
            )
            .await?;

        let received = raw.len();
        let coins: Vec<CoinSnapshot> =
            raw.into_iter().filter_map(CoinSnapshot::from_market).collect();
        if coins.len() < received {
            warn!("Dropped {} market records without id/symbol/name", received - coins.len());
        }
        info!("Fetched {} coins from market list", coins.len());
        Ok(coins)
    }

    /// Blank queries short-circuit to an empty result without a request.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, FetchError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let raw: SearchResponse = self
            .get_json(COINGECKO_SEARCH_PATH, &[("query", query.to_string())])
            .await?;

        let results: Vec<SearchResult> = raw
            .coins
            .into_iter()
            .filter_map(SearchResult::from_search)
            .collect();
        info!("Search '{}' matched {} coins", query, results.len());
        Ok(results)
    }

    /// `Ok(None)` when the provider does not know `id`.
    pub async fn fetch_details(&self, id: &str) -> Result<Option<CoinSnapshot>, FetchError> {
        validate_id(id)?;
        let path = format!("{COINGECKO_COINS_PATH}/{id}");

        let result = self
            .get_json::<CoinDetailResponse>(
                &path,
                &[
                    ("localization", "false".to_string()),
                    ("tickers", "false".to_string()),
                    ("market_data", "true".to_string()),
                    ("community_data", "false".to_string()),
                    ("developer_data", "false".to_string()),
                    ("sparkline", "false".to_string()),
                ],
            )
            .await;

        match result {
            Ok(raw) => Ok(CoinSnapshot::from_detail(raw, &self.config.vs_currency)),
            Err(FetchError::Status { status: 404, .. }) => {
                debug!("Coin '{}' not found", id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Price samples for the last `days` days, oldest first.
    pub async fn fetch_price_history(
        &self,
        id: &str,
        days: u32,
    ) -> Result<Vec<PriceHistoryPoint>, FetchError> {
        validate_id(id)?;
        if days == 0 {
            return Err(FetchError::InvalidRequest("days must be positive".to_string()));
        }
        let path = format!("{COINGECKO_COINS_PATH}/{id}{COINGECKO_MARKET_CHART_PATH}");

        let raw: MarketChartResponse = self
            .get_json(
                &path,
                &[
                    ("vs_currency", self.config.vs_currency.clone()),
                    ("days", days.to_string()),
                ],
            )
            .await?;

        let history = history_from_chart(raw);
        info!("Fetched {} price points for '{}' over {} days", history.len(), id, days);
        Ok(history)
    }
}

impl Default for MarketClient {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

#[async_trait]
impl MarketSource for MarketClient {
    async fn fetch_market_list(&self, limit: u32) -> Result<Vec<CoinSnapshot>, FetchError> {
        MarketClient::fetch_market_list(self, limit).await
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, FetchError> {
        MarketClient::search(self, query).await
    }

    async fn fetch_details(&self, id: &str) -> Result<Option<CoinSnapshot>, FetchError> {
        MarketClient::fetch_details(self, id).await
    }

    async fn fetch_price_history(
        &self,
        id: &str,
        days: u32,
    ) -> Result<Vec<PriceHistoryPoint>, FetchError> {
        MarketClient::fetch_price_history(self, id, days).await
    }
}

/// Coin ids go into the URL path verbatim.
fn validate_id(id: &str) -> Result<(), FetchError> {
    if id.is_empty()
        || id
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '%'))
    {
        return Err(FetchError::InvalidRequest(format!("invalid coin id '{id}'")));
    }
    Ok(())
}
