use log::debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::config::SEARCH_DEBOUNCE_MS;
use crate::data::{CoinSnapshot, SearchResult};
use crate::error::FetchError;
use crate::query::filter_by_substring;
use crate::request::MarketSource;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<T> {
    Completed(T),
    /// A newer search started before this one finished; its results were dropped.
    Superseded,
}

impl<T> SearchOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            SearchOutcome::Completed(value) => Some(value),
            SearchOutcome::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, SearchOutcome::Superseded)
    }
}

/// Remote search for one search box. Every call takes a new generation; only
/// the call holding the latest generation may deliver results. Clones share
/// the counter.
#[derive(Debug)]
pub struct SearchSession<S> {
    source: Arc<S>,
    generation: Arc<AtomicU64>,
    debounce: Duration,
}

impl<S> Clone for SearchSession<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            generation: Arc::clone(&self.generation),
            debounce: self.debounce,
        }
    }
}

impl<S: MarketSource> SearchSession<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            generation: Arc::new(AtomicU64::new(0)),
            debounce: Duration::from_millis(SEARCH_DEBOUNCE_MS),
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    /// Makes every in-flight search stale, e.g. when the box is cleared.
    pub fn invalidate(&self) {
        self.begin();
    }

    pub async fn search(
        &self,
        text: &str,
    ) -> Result<SearchOutcome<Vec<SearchResult>>, FetchError> {
        let generation = self.begin();

        if !self.debounce.is_zero() {
            tokio::time::sleep(self.debounce).await;
        }
        if !self.is_current(generation) {
            debug!("Search '{}' (#{}) superseded while debouncing", text, generation);
            return Ok(SearchOutcome::Superseded);
        }

        let result = self.source.search(text).await;
        if !self.is_current(generation) {
            debug!("Discarding stale results for '{}' (#{})", text, generation);
            return Ok(SearchOutcome::Superseded);
        }

        result.map(SearchOutcome::Completed)
    }
}

/// Same matching as the market list filter, over an already fetched list.
/// A blank query finds nothing.
pub fn search_local(universe: &[CoinSnapshot], text: &str) -> Vec<CoinSnapshot> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    filter_by_substring(universe, text)
}
