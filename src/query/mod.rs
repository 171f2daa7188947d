//! Client-side filtering and ordering of fetched coin lists. Pure functions,
//! no I/O; filtering always runs before sorting when both are requested.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::data::CoinSnapshot;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    MarketCap,
    CurrentPrice,
    #[serde(rename = "price_change_percentage_24h")]
    PriceChangePercentage24h,
    TotalVolume,
    Name,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::MarketCap,
        SortKey::CurrentPrice,
        SortKey::PriceChangePercentage24h,
        SortKey::TotalVolume,
        SortKey::Name,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::MarketCap => "market_cap",
            SortKey::CurrentPrice => "current_price",
            SortKey::PriceChangePercentage24h => "price_change_percentage_24h",
            SortKey::TotalVolume => "total_volume",
            SortKey::Name => "name",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::MarketCap => "Market Cap",
            SortKey::CurrentPrice => "Price",
            SortKey::PriceChangePercentage24h => "24h Change",
            SortKey::TotalVolume => "Volume",
            SortKey::Name => "Name",
        }
    }

    fn numeric(&self, coin: &CoinSnapshot) -> f64 {
        let value = match self {
            SortKey::MarketCap => coin.market_cap,
            SortKey::CurrentPrice => coin.current_price,
            SortKey::PriceChangePercentage24h => coin.price_change_percentage_24h,
            SortKey::TotalVolume => coin.total_volume,
            SortKey::Name => 0.0,
        };
        if value.is_nan() { 0.0 } else { value }
    }

    fn compare(&self, a: &CoinSnapshot, b: &CoinSnapshot) -> Ordering {
        match self {
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            _ => self
                .numeric(a)
                .partial_cmp(&self.numeric(b))
                .unwrap_or(Ordering::Equal),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown sort key '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    pub fn arrow(&self) -> char {
        match self {
            SortDirection::Ascending => '↑',
            SortDirection::Descending => '↓',
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Ascending),
            "desc" => Ok(SortDirection::Descending),
            other => Err(format!("unknown sort direction '{other}'")),
        }
    }
}

/// Case-insensitive substring match on name or symbol. A blank query keeps everything.
pub fn filter_by_substring(items: &[CoinSnapshot], query: &str) -> Vec<CoinSnapshot> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }

    items
        .iter()
        .filter(|coin| {
            coin.name.to_lowercase().contains(&needle)
                || coin.symbol.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Stable in both directions: ties keep their input order. Descending is the
/// exact reverse of ascending only when the keys are distinct; names equal up
/// to case are ties.
pub fn sort(items: &[CoinSnapshot], key: SortKey, direction: SortDirection) -> Vec<CoinSnapshot> {
    items
        .iter()
        .cloned()
        .sorted_by(|a, b| match direction {
            SortDirection::Ascending => key.compare(a, b),
            SortDirection::Descending => key.compare(b, a),
        })
        .collect()
}

/// Search text plus ordering, as chosen in the market list's filter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub text: String,
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Query {
    pub fn new(text: impl Into<String>, key: SortKey, direction: SortDirection) -> Self {
        Self {
            text: text.into(),
            key,
            direction,
        }
    }

    pub fn apply(&self, items: &[CoinSnapshot]) -> Vec<CoinSnapshot> {
        sort(&filter_by_substring(items, &self.text), self.key, self.direction)
    }

    /// Button caption such as `Market Cap (↓)`.
    pub fn caption(&self) -> String {
        format!("{} ({})", self.key.label(), self.direction.arrow())
    }
}
