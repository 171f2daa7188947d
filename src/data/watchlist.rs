use serde::Serialize;

use super::coin::CoinSnapshot;

/// Copy of the snapshot taken when the coin was added; prices are not refreshed.
pub type WatchlistEntry = CoinSnapshot;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WatchlistStats {
    pub gainers: usize,
    pub losers: usize,
}

impl WatchlistStats {
    pub fn from_entries(entries: &[WatchlistEntry]) -> Self {
        let gainers = entries.iter().filter(|entry| entry.is_gaining()).count();
        Self {
            gainers,
            losers: entries.len() - gainers,
        }
    }
}
