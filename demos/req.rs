use coinwatch::MarketClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let query = std::env::args().nth(1).unwrap_or_else(|| "bitcoin".to_string());
    let client = MarketClient::default();

    let results = client.search(&query).await?;

    println!("Coins matching '{}':", query);
    for item in results {
        let rank = item
            .market_cap_rank
            .map(|rank| format!("#{rank}"))
            .unwrap_or_else(|| "-".to_string());
        println!("{:>6}  {:<10} {}", rank, item.symbol, item.name);
    }

    Ok(())
}
