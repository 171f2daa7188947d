pub mod coin;
pub mod format;
pub mod history;
pub mod portfolio;
pub mod watchlist;

pub use coin::{CoinSnapshot, SearchResult};
pub use format::{format_percentage, format_price};
pub use history::{PriceHistoryPoint, history_from_chart};
pub use portfolio::{HoldingUpdate, PortfolioHolding, PortfolioTotals};
pub use watchlist::{WatchlistEntry, WatchlistStats};
