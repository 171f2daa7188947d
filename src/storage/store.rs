use itertools::Itertools;
use log::{debug, info};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::backend::KeyValueStore;
use crate::config::{RECENT_SEARCHES_LIMIT, StoreKeys};
use crate::data::{HoldingUpdate, PortfolioHolding, WatchlistEntry};
use crate::error::StoreError;

/// Watchlist, portfolio and recent searches, each kept as one JSON array
/// under the key given in [`StoreKeys`].
///
/// Assumes a single logical writer: every mutation is a read-modify-write of
/// the whole collection without locking across the two steps.
#[derive(Debug, Clone)]
pub struct PersistenceStore<B> {
    backend: B,
    keys: StoreKeys,
}

impl<B: KeyValueStore> PersistenceStore<B> {
    pub fn new(backend: B, keys: StoreKeys) -> Self {
        Self { backend, keys }
    }

    pub fn keys(&self) -> &StoreKeys {
        &self.keys
    }

    fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        match self.backend.get(key)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(items)?;
        self.backend.set(key, bytes)?;
        debug!("Wrote {} items under '{}'", items.len(), key);
        Ok(())
    }

    // Watchlist

    pub fn read_watchlist(&self) -> Result<Vec<WatchlistEntry>, StoreError> {
        self.read_collection(&self.keys.watchlist)
    }

    /// `Ok(false)` when an entry with the same id is already present.
    pub fn add_to_watchlist(&self, entry: WatchlistEntry) -> Result<bool, StoreError> {
        let entry = entry.normalized();
        let mut watchlist = self.read_watchlist()?;
        if watchlist.iter().any(|existing| existing.id == entry.id) {
            debug!("'{}' already in watchlist", entry.id);
            return Ok(false);
        }

        info!("Adding '{}' to watchlist", entry.id);
        watchlist.push(entry);
        self.write_collection(&self.keys.watchlist, &watchlist)?;
        Ok(true)
    }

    /// Removing an id that is not present is not an error.
    pub fn remove_from_watchlist(&self, id: &str) -> Result<(), StoreError> {
        let mut watchlist = self.read_watchlist()?;
        watchlist.retain(|entry| entry.id != id);
        info!("Removing '{}' from watchlist", id);
        self.write_collection(&self.keys.watchlist, &watchlist)
    }

    pub fn is_in_watchlist(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.read_watchlist()?.iter().any(|entry| entry.id == id))
    }

    /// Flips membership and returns whether the coin is watched afterwards.
    pub fn toggle_watchlist(&self, entry: WatchlistEntry) -> Result<bool, StoreError> {
        if self.is_in_watchlist(&entry.id)? {
            self.remove_from_watchlist(&entry.id)?;
            Ok(false)
        } else {
            self.add_to_watchlist(entry)
        }
    }

    // Portfolio

    pub fn read_portfolio(&self) -> Result<Vec<PortfolioHolding>, StoreError> {
        self.read_collection(&self.keys.portfolio)
    }

    /// Appends without de-duplication; several lots may share an id.
    pub fn add_holding(&self, holding: PortfolioHolding) -> Result<(), StoreError> {
        holding.validate().map_err(StoreError::InvalidHolding)?;

        let mut portfolio = self.read_portfolio()?;
        info!(
            "Adding holding '{}': {} @ {}",
            holding.id, holding.amount, holding.purchase_price
        );
        portfolio.push(holding);
        self.write_collection(&self.keys.portfolio, &portfolio)
    }

    /// Merges `update` into every holding with `id`. `Ok(false)` and no write
    /// when nothing matched.
    pub fn update_holding(&self, id: &str, update: &HoldingUpdate) -> Result<bool, StoreError> {
        let mut portfolio = self.read_portfolio()?;
        let mut matched = false;

        for holding in portfolio.iter_mut().filter(|holding| holding.id == id) {
            holding.apply(update);
            holding.validate().map_err(StoreError::InvalidHolding)?;
            matched = true;
        }

        if !matched {
            debug!("No holding '{}' to update", id);
            return Ok(false);
        }

        self.write_collection(&self.keys.portfolio, &portfolio)?;
        Ok(true)
    }

    pub fn remove_holding(&self, id: &str) -> Result<(), StoreError> {
        let mut portfolio = self.read_portfolio()?;
        portfolio.retain(|holding| holding.id != id);
        info!("Removing holding '{}'", id);
        self.write_collection(&self.keys.portfolio, &portfolio)
    }

    // Recent searches

    pub fn read_recent_searches(&self) -> Result<Vec<String>, StoreError> {
        self.read_collection(&self.keys.recent_searches)
    }

    /// Moves `query` to the front, keeping at most [`RECENT_SEARCHES_LIMIT`] unique entries.
    pub fn push_recent_search(&self, query: &str) -> Result<Vec<String>, StoreError> {
        let query = query.trim();
        let previous = self.read_recent_searches()?;
        if query.is_empty() {
            return Ok(previous);
        }

        let recent: Vec<String> = std::iter::once(query.to_string())
            .chain(previous)
            .unique()
            .take(RECENT_SEARCHES_LIMIT)
            .collect();
        self.write_collection(&self.keys.recent_searches, &recent)?;
        Ok(recent)
    }

    pub fn clear_recent_searches(&self) -> Result<(), StoreError> {
        self.backend.remove(&self.keys.recent_searches)
    }
}
