//! Raw CoinGecko payloads. Every numeric field is optional here; the
//! normalization into [`crate::data::CoinSnapshot`] decides the defaults.

use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Default, Deserialize)]
pub struct MarketCoin {
    pub id: Option<String>,
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub market_cap_rank: Option<u32>,
    pub total_volume: Option<f64>,
    pub price_change_24h: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub max_supply: Option<f64>,
    pub sparkline_in_7d: Option<Sparkline>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Sparkline {
    #[serde(default)]
    pub price: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub coins: Vec<SearchCoin>,
}

#[derive(Debug, Deserialize)]
pub struct SearchCoin {
    pub id: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub market_cap_rank: Option<u32>,
    pub thumb: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CoinDetailResponse {
    pub id: Option<String>,
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub market_cap_rank: Option<u32>,
    pub image: Option<DetailImage>,
    pub market_data: Option<DetailMarketData>,
}

#[derive(Debug, Deserialize)]
pub struct DetailImage {
    pub thumb: Option<String>,
    pub small: Option<String>,
    pub large: Option<String>,
}

/// Price figures keyed by quote currency (`"usd"`, `"eur"`, ...).
pub type CurrencyMap = HashMap<String, Option<f64>>;

#[derive(Debug, Default, Deserialize)]
pub struct DetailMarketData {
    #[serde(default)]
    pub current_price: CurrencyMap,
    #[serde(default)]
    pub market_cap: CurrencyMap,
    #[serde(default)]
    pub total_volume: CurrencyMap,
    #[serde(default)]
    pub price_change_24h_in_currency: CurrencyMap,
    pub price_change_percentage_24h: Option<f64>,
    pub price_change_24h: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub max_supply: Option<f64>,
    pub sparkline_7d: Option<Sparkline>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MarketChartResponse {
    #[serde(default)]
    pub prices: Vec<(f64, Option<f64>)>,
}
