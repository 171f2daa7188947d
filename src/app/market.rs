use crate::data::CoinSnapshot;
use crate::query::{Query, SortDirection, SortKey};

/// The market list screen: last fetched coins plus the active filter and ordering.
#[derive(Debug, Clone, Default)]
pub struct MarketBoard {
    coins: Vec<CoinSnapshot>,
    query: Query,
}

impl MarketBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supersedes the previous list wholesale.
    pub fn replace(&mut self, coins: Vec<CoinSnapshot>) {
        self.coins = coins;
    }

    pub fn coins(&self) -> &[CoinSnapshot] {
        &self.coins
    }

    pub fn has_data(&self) -> bool {
        !self.coins.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&CoinSnapshot> {
        self.coins.iter().find(|coin| coin.id == id)
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn visible(&self) -> Vec<CoinSnapshot> {
        self.query.apply(&self.coins)
    }

    /// Leading coins in provider order, i.e. the largest by market cap.
    pub fn popular(&self, count: usize) -> &[CoinSnapshot] {
        &self.coins[..count.min(self.coins.len())]
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.query.text = text.into();
    }

    pub fn set_sort(&mut self, key: SortKey, direction: SortDirection) {
        self.query.key = key;
        self.query.direction = direction;
    }

    /// Back to market cap, descending. The search text is kept.
    pub fn reset_sort(&mut self) {
        let defaults = Query::default();
        self.set_sort(defaults.key, defaults.direction);
    }
}
