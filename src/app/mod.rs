//! Screen-level state: what the market, search, detail, watchlist and
//! portfolio screens ask of the client and the store. Nothing here renders.

pub mod market;
pub mod search;

pub use market::MarketBoard;
pub use search::{SearchOutcome, SearchSession, search_local};

use itertools::Itertools;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{DEFAULT_HISTORY_DAYS, POPULAR_COUNT};
use crate::data::{
    CoinSnapshot, HoldingUpdate, PortfolioHolding, PortfolioTotals, PriceHistoryPoint,
    SearchResult, WatchlistEntry, WatchlistStats,
};
use crate::error::{AppError, FetchError, StoreError};
use crate::query::{SortDirection, SortKey};
use crate::request::MarketSource;
use crate::storage::{KeyValueStore, PersistenceStore};

#[derive(Debug, Clone, PartialEq)]
pub struct CoinDetail {
    pub coin: Option<CoinSnapshot>,
    pub history: Vec<PriceHistoryPoint>,
    pub in_watchlist: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WatchlistView {
    pub entries: Vec<WatchlistEntry>,
    pub stats: WatchlistStats,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioView {
    pub holdings: Vec<PortfolioHolding>,
    pub totals: PortfolioTotals,
}

pub struct App<S, B> {
    source: Arc<S>,
    store: PersistenceStore<B>,
    market: MarketBoard,
    search: SearchSession<S>,
    history_days: u32,
}

impl<S: MarketSource, B: KeyValueStore> App<S, B> {
    pub fn new(source: S, store: PersistenceStore<B>) -> Self {
        let source = Arc::new(source);
        Self {
            search: SearchSession::new(Arc::clone(&source)),
            source,
            store,
            market: MarketBoard::new(),
            history_days: DEFAULT_HISTORY_DAYS,
        }
    }

    pub fn with_search_debounce(mut self, debounce: Duration) -> Self {
        self.search = self.search.with_debounce(debounce);
        self
    }

    pub fn with_history_days(mut self, days: u32) -> Self {
        self.history_days = days;
        self
    }

    pub fn store(&self) -> &PersistenceStore<B> {
        &self.store
    }

    pub fn market(&self) -> &MarketBoard {
        &self.market
    }

    pub fn search_session(&self) -> SearchSession<S> {
        self.search.clone()
    }

    // Market list

    /// On failure the previously loaded list stays in place.
    pub async fn refresh_market(&mut self, limit: u32) -> Result<usize, FetchError> {
        let coins = self.source.fetch_market_list(limit).await?;
        let count = coins.len();
        self.market.replace(coins);
        Ok(count)
    }

    pub fn visible_coins(&self) -> Vec<CoinSnapshot> {
        self.market.visible()
    }

    pub fn popular(&self) -> &[CoinSnapshot] {
        self.market.popular(POPULAR_COUNT)
    }

    pub fn set_filter_text(&mut self, text: impl Into<String>) {
        self.market.set_text(text);
    }

    pub fn set_sort(&mut self, key: SortKey, direction: SortDirection) {
        self.market.set_sort(key, direction);
    }

    pub fn reset_sort(&mut self) {
        self.market.reset_sort();
    }

    // Search

    pub async fn search(
        &self,
        text: &str,
    ) -> Result<SearchOutcome<Vec<SearchResult>>, FetchError> {
        let outcome = self.search.search(text).await?;
        if !outcome.is_superseded() {
            self.remember_search(text);
        }
        Ok(outcome)
    }

    /// Searches the loaded market list instead of the provider.
    pub fn search_loaded(&self, text: &str) -> Vec<CoinSnapshot> {
        let results = search_local(self.market.coins(), text);
        self.remember_search(text);
        results
    }

    fn remember_search(&self, text: &str) {
        if let Err(e) = self.store.push_recent_search(text) {
            warn!("Could not record recent search '{}': {}", text.trim(), e);
        }
    }

    pub fn recent_searches(&self) -> Result<Vec<String>, StoreError> {
        self.store.read_recent_searches()
    }

    pub fn clear_recent_searches(&self) -> Result<(), StoreError> {
        self.store.clear_recent_searches()
    }

    // Detail

    /// Details and history are fetched concurrently. When the provider does
    /// not know the coin, the snapshot from the market list is used if loaded.
    /// A failed history load leaves the chart empty.
    pub async fn open_detail(&self, id: &str) -> Result<CoinDetail, AppError> {
        let (details, history) = futures::join!(
            self.source.fetch_details(id),
            self.source.fetch_price_history(id, self.history_days)
        );

        let coin = details?.or_else(|| self.market.find(id).cloned());
        let history = history.unwrap_or_else(|e| {
            warn!("Price history for '{}' unavailable: {}", id, e);
            Vec::new()
        });
        Ok(CoinDetail {
            coin,
            history,
            in_watchlist: self.store.is_in_watchlist(id)?,
        })
    }

    // Watchlist

    pub fn toggle_watchlist(&self, coin: &CoinSnapshot) -> Result<bool, StoreError> {
        self.store.toggle_watchlist(coin.clone())
    }

    pub fn watchlist(&self) -> Result<WatchlistView, StoreError> {
        let entries = self.store.read_watchlist()?;
        let stats = WatchlistStats::from_entries(&entries);
        Ok(WatchlistView { entries, stats })
    }

    pub fn remove_from_watchlist(&self, id: &str) -> Result<(), StoreError> {
        self.store.remove_from_watchlist(id)
    }

    // Portfolio

    pub fn portfolio(&self) -> Result<PortfolioView, StoreError> {
        let holdings = self.store.read_portfolio()?;
        let totals = PortfolioTotals::from_holdings(&holdings);
        Ok(PortfolioView { holdings, totals })
    }

    /// Records a purchase of `coin`, valued at the snapshot's price for now.
    pub fn add_holding(
        &self,
        coin: &CoinSnapshot,
        amount: f64,
        purchase_price: f64,
    ) -> Result<(), StoreError> {
        let holding =
            PortfolioHolding::new(&coin.id, &coin.symbol, &coin.name, amount, purchase_price)
                .with_current_price(coin.current_price);
        self.store.add_holding(holding)
    }

    pub fn update_holding(&self, id: &str, update: &HoldingUpdate) -> Result<bool, StoreError> {
        self.store.update_holding(id, update)
    }

    pub fn remove_holding(&self, id: &str) -> Result<(), StoreError> {
        self.store.remove_holding(id)
    }

    /// Copies prices from the loaded market list into matching holdings and
    /// returns how many coin ids changed. Holdings for coins that are not
    /// loaded, or loaded without a price, keep their last price.
    pub fn reprice_portfolio(&self) -> Result<usize, StoreError> {
        let stale: Vec<(String, f64)> = self
            .store
            .read_portfolio()?
            .into_iter()
            .filter_map(|holding| {
                let coin = self.market.find(&holding.id)?;
                (coin.current_price > 0.0 && coin.current_price != holding.current_price)
                    .then(|| (holding.id, coin.current_price))
            })
            .unique_by(|(id, _)| id.clone())
            .collect();

        for (id, price) in &stale {
            self.store
                .update_holding(id, &HoldingUpdate::current_price(*price))?;
        }
        info!("Repriced {} coins in portfolio from market list", stale.len());
        Ok(stale.len())
    }
}
