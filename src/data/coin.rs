use serde::{Deserialize, Deserializer, Serialize};

use crate::third_party::coingecko::data::{
    CoinDetailResponse, CurrencyMap, MarketCoin, SearchCoin, Sparkline,
};

/// Market state of one coin at fetch time.
///
/// Provider records come in through [`CoinSnapshot::from_market`] or
/// [`CoinSnapshot::from_detail`], which is where missing or malformed
/// numbers are normalized. Snapshots built by hand go through
/// [`CoinSnapshot::normalized`] before they are stored; stored `null`
/// figures read back as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinSnapshot {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(deserialize_with = "zero_if_null")]
    pub current_price: f64,
    #[serde(deserialize_with = "zero_if_null")]
    pub market_cap: f64,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(deserialize_with = "zero_if_null")]
    pub total_volume: f64,
    #[serde(deserialize_with = "zero_if_null")]
    pub price_change_percentage_24h: f64,
    #[serde(deserialize_with = "zero_if_null")]
    pub price_change_24h: f64,
    #[serde(deserialize_with = "zero_if_null")]
    pub circulating_supply: f64,
    #[serde(default)]
    pub max_supply: Option<f64>,
    #[serde(default)]
    pub sparkline_7d: Option<Vec<f64>>,
}

impl CoinSnapshot {
    /// Minimal snapshot with every figure at zero.
    pub fn new(id: impl Into<String>, symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
            image: None,
            current_price: 0.0,
            market_cap: 0.0,
            market_cap_rank: None,
            total_volume: 0.0,
            price_change_percentage_24h: 0.0,
            price_change_24h: 0.0,
            circulating_supply: 0.0,
            max_supply: None,
            sparkline_7d: None,
        }
    }

    /// Returns `None` when the record has no usable identity.
    pub fn from_market(raw: MarketCoin) -> Option<Self> {
        let (id, symbol, name) = identity(raw.id, raw.symbol, raw.name)?;

        Some(Self {
            id,
            symbol,
            name,
            image: raw.image.filter(|url| !url.is_empty()),
            current_price: non_negative(raw.current_price),
            market_cap: non_negative(raw.market_cap),
            market_cap_rank: raw.market_cap_rank.filter(|rank| *rank >= 1),
            total_volume: non_negative(raw.total_volume),
            price_change_percentage_24h: signed(raw.price_change_percentage_24h),
            price_change_24h: signed(raw.price_change_24h),
            circulating_supply: non_negative(raw.circulating_supply),
            max_supply: optional_non_negative(raw.max_supply),
            sparkline_7d: raw.sparkline_in_7d.and_then(sparkline),
        })
    }

    /// Detail payloads nest their prices per currency, so the quote unit is needed.
    pub fn from_detail(raw: CoinDetailResponse, vs_currency: &str) -> Option<Self> {
        let (id, symbol, name) = identity(raw.id, raw.symbol, raw.name)?;
        let market = raw.market_data.unwrap_or_default();
        let image = raw
            .image
            .and_then(|image| image.large.or(image.small).or(image.thumb))
            .filter(|url| !url.is_empty());

        let price_change_24h = market
            .price_change_24h
            .or_else(|| in_currency(&market.price_change_24h_in_currency, vs_currency));

        Some(Self {
            id,
            symbol,
            name,
            image,
            current_price: non_negative(in_currency(&market.current_price, vs_currency)),
            market_cap: non_negative(in_currency(&market.market_cap, vs_currency)),
            market_cap_rank: raw.market_cap_rank.filter(|rank| *rank >= 1),
            total_volume: non_negative(in_currency(&market.total_volume, vs_currency)),
            price_change_percentage_24h: signed(market.price_change_percentage_24h),
            price_change_24h: signed(price_change_24h),
            circulating_supply: non_negative(market.circulating_supply),
            max_supply: optional_non_negative(market.max_supply),
            sparkline_7d: market.sparkline_7d.and_then(sparkline),
        })
    }

    /// Applies the provider normalization to figures set directly: non-finite
    /// values become zero (or `None`), negative amounts are clamped.
    pub fn normalized(self) -> Self {
        Self {
            current_price: non_negative(Some(self.current_price)),
            market_cap: non_negative(Some(self.market_cap)),
            total_volume: non_negative(Some(self.total_volume)),
            price_change_percentage_24h: signed(Some(self.price_change_percentage_24h)),
            price_change_24h: signed(Some(self.price_change_24h)),
            circulating_supply: non_negative(Some(self.circulating_supply)),
            max_supply: optional_non_negative(self.max_supply),
            sparkline_7d: self.sparkline_7d.and_then(finite_series),
            ..self
        }
    }

    pub fn is_gaining(&self) -> bool {
        self.price_change_percentage_24h >= 0.0
    }

    pub fn is_capped(&self) -> bool {
        self.max_supply.is_some()
    }
}

/// Lightweight hit from the provider's search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub market_cap_rank: Option<u32>,
    pub thumb: Option<String>,
}

impl SearchResult {
    pub fn from_search(raw: SearchCoin) -> Option<Self> {
        let (id, symbol, name) = identity(raw.id, raw.symbol, raw.name)?;
        Some(Self {
            id,
            symbol,
            name,
            market_cap_rank: raw.market_cap_rank.filter(|rank| *rank >= 1),
            thumb: raw.thumb.filter(|url| !url.is_empty()),
        })
    }
}

fn identity(
    id: Option<String>,
    symbol: Option<String>,
    name: Option<String>,
) -> Option<(String, String, String)> {
    let id = id.filter(|id| !id.trim().is_empty())?;
    let symbol = symbol.filter(|symbol| !symbol.trim().is_empty())?;
    let name = name.filter(|name| !name.trim().is_empty())?;
    Some((id, symbol, name))
}

fn signed(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn non_negative(value: Option<f64>) -> f64 {
    signed(value).max(0.0)
}

fn optional_non_negative(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite()).map(|v| v.max(0.0))
}

fn zero_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(signed(Option::<f64>::deserialize(deserializer)?))
}

fn in_currency(map: &CurrencyMap, vs_currency: &str) -> Option<f64> {
    map.get(vs_currency).copied().flatten()
}

fn sparkline(raw: Sparkline) -> Option<Vec<f64>> {
    finite_series(raw.price.into_iter().flatten())
}

fn finite_series(prices: impl IntoIterator<Item = f64>) -> Option<Vec<f64>> {
    let prices: Vec<f64> = prices
        .into_iter()
        .filter(|price| price.is_finite())
        .collect();
    (!prices.is_empty()).then_some(prices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn market(value: serde_json::Value) -> MarketCoin {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn market_record_is_normalized() {
        let coin = CoinSnapshot::from_market(market(json!({
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "current_price": 64000.5,
            "market_cap": 1.2e12,
            "market_cap_rank": 1,
            "total_volume": 3.1e10,
            "price_change_24h": -120.0,
            "price_change_percentage_24h": -0.19,
            "circulating_supply": 19700000.0,
            "max_supply": 21000000.0,
            "sparkline_in_7d": { "price": [63000.0, null, 64000.5] }
        })))
        .unwrap();

        assert_eq!(coin.id, "bitcoin");
        assert_eq!(coin.market_cap_rank, Some(1));
        assert_eq!(coin.price_change_24h, -120.0);
        assert!(!coin.is_gaining());
        assert!(coin.is_capped());
        assert_eq!(coin.sparkline_7d, Some(vec![63000.0, 64000.5]));
    }

    #[test]
    fn missing_numbers_become_zero() {
        let coin = CoinSnapshot::from_market(market(json!({
            "id": "newcoin",
            "symbol": "new",
            "name": "New Coin",
            "current_price": null,
            "market_cap": -5.0,
            "max_supply": null
        })))
        .unwrap();

        assert_eq!(coin.current_price, 0.0);
        assert_eq!(coin.market_cap, 0.0);
        assert_eq!(coin.total_volume, 0.0);
        assert_eq!(coin.max_supply, None);
        assert_eq!(coin.sparkline_7d, None);
        assert!(coin.is_gaining());
    }

    #[test]
    fn records_without_identity_are_dropped() {
        assert!(CoinSnapshot::from_market(market(json!({ "symbol": "x", "name": "X" }))).is_none());
        assert!(
            CoinSnapshot::from_market(market(json!({ "id": " ", "symbol": "x", "name": "X" })))
                .is_none()
        );
    }

    #[test]
    fn detail_reads_configured_currency() {
        let raw: CoinDetailResponse = serde_json::from_value(json!({
            "id": "ethereum",
            "symbol": "eth",
            "name": "Ethereum",
            "market_cap_rank": 2,
            "image": { "thumb": "t.png", "small": "s.png", "large": "l.png" },
            "market_data": {
                "current_price": { "usd": 3000.0, "eur": 2700.0 },
                "market_cap": { "usd": 3.6e11, "eur": 3.2e11 },
                "total_volume": { "usd": 1.5e10 },
                "price_change_24h_in_currency": { "eur": 27.0 },
                "price_change_percentage_24h": 1.5,
                "circulating_supply": 120000000.0,
                "max_supply": null
            }
        }))
        .unwrap();

        let coin = CoinSnapshot::from_detail(raw, "eur").unwrap();
        assert_eq!(coin.current_price, 2700.0);
        assert_eq!(coin.market_cap, 3.2e11);
        assert_eq!(coin.total_volume, 0.0);
        assert_eq!(coin.price_change_24h, 27.0);
        assert_eq!(coin.image.as_deref(), Some("l.png"));
        assert!(!coin.is_capped());
    }

    #[test]
    fn snapshot_survives_storage_encoding() {
        let mut coin = CoinSnapshot::new("solana", "sol", "Solana");
        coin.current_price = 150.0;
        let encoded = serde_json::to_string(&coin).unwrap();
        let decoded: CoinSnapshot = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, coin);
    }

    #[test]
    fn hand_built_figures_are_normalized() {
        let mut coin = CoinSnapshot::new("luna", "luna", "Terra");
        coin.current_price = f64::NAN;
        coin.market_cap = -1.0;
        coin.price_change_24h = f64::NEG_INFINITY;
        coin.price_change_percentage_24h = -99.9;
        coin.max_supply = Some(f64::INFINITY);
        coin.sparkline_7d = Some(vec![f64::NAN]);

        let coin = coin.normalized();
        assert_eq!(coin.current_price, 0.0);
        assert_eq!(coin.market_cap, 0.0);
        assert_eq!(coin.price_change_24h, 0.0);
        assert_eq!(coin.price_change_percentage_24h, -99.9);
        assert_eq!(coin.max_supply, None);
        assert_eq!(coin.sparkline_7d, None);
    }

    #[test]
    fn stored_null_figures_read_as_zero() {
        let coin: CoinSnapshot = serde_json::from_value(json!({
            "id": "luna",
            "symbol": "luna",
            "name": "Terra",
            "current_price": null,
            "market_cap": 10.0,
            "total_volume": null,
            "price_change_percentage_24h": null,
            "price_change_24h": null,
            "circulating_supply": null
        }))
        .unwrap();
        assert_eq!(coin.current_price, 0.0);
        assert_eq!(coin.market_cap, 10.0);
    }
}
