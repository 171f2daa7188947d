//! Top coins by 24h change, plus a watchlist kept in a local sled database.

use coinwatch::config::DEFAULT_MARKET_LIMIT;
use coinwatch::data::{format_percentage, format_price};
use coinwatch::{App, MarketClient, PersistenceStore, SledStore, SortDirection, SortKey, StoreKeys};
use color_eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let store = PersistenceStore::new(SledStore::open("/tmp/coinwatch.db")?, StoreKeys::default());
    let mut app = App::new(MarketClient::default(), store);

    app.refresh_market(DEFAULT_MARKET_LIMIT).await?;
    app.set_sort(SortKey::PriceChangePercentage24h, SortDirection::Descending);

    println!("{:<8} {:<24} {:>16} {:>10}", "Symbol", "Name", "Price", "24h");
    for coin in app.visible_coins().iter().take(20) {
        println!(
            "{:<8} {:<24} {:>16} {:>10}",
            coin.symbol.to_uppercase(),
            coin.name,
            format_price(coin.current_price),
            format_percentage(coin.price_change_percentage_24h)
        );
    }

    if let Some(top) = app.visible_coins().first() {
        let watched = app.toggle_watchlist(top)?;
        println!(
            "\n{} {} watchlist",
            top.name,
            if watched { "added to" } else { "removed from" }
        );
    }

    let watchlist = app.watchlist()?;
    println!(
        "Watchlist: {} coins ({} up, {} down)",
        watchlist.entries.len(),
        watchlist.stats.gainers,
        watchlist.stats.losers
    );

    Ok(())
}
