use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::third_party::coingecko::data::MarketChartResponse;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceHistoryPoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl PriceHistoryPoint {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// Chart samples in ascending time order. Samples with an unrepresentable
/// timestamp or a missing price are skipped.
pub fn history_from_chart(raw: MarketChartResponse) -> Vec<PriceHistoryPoint> {
    let mut points: Vec<PriceHistoryPoint> = raw
        .prices
        .into_iter()
        .filter_map(|(millis, price)| {
            let price = price.filter(|p| p.is_finite())?;
            if !millis.is_finite() {
                return None;
            }
            let timestamp = DateTime::from_timestamp_millis(millis as i64)?;
            Some(PriceHistoryPoint::new(timestamp, price))
        })
        .collect();

    points.sort_by_key(|point| point.timestamp);
    points
}
