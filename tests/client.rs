use coinwatch::{
    App, ClientConfig, FetchError, MarketClient, MemoryStore, PersistenceStore, SortDirection,
    SortKey, StoreKeys, sort,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> MarketClient {
    MarketClient::new(ClientConfig::with_base_url(server.uri()))
}

#[tokio::test]
async fn market_list_sends_expected_query_and_normalizes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coins/markets"))
        .and(query_param("vs_currency", "usd"))
        .and(query_param("order", "market_cap_desc"))
        .and(query_param("per_page", "3"))
        .and(query_param("page", "1"))
        .and(query_param("sparkline", "true"))
        .and(query_param("price_change_percentage", "24h"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "btc", "symbol": "btc", "name": "Bitcoin",
                "market_cap": 900.0, "current_price": 60000.0
            },
            {
                "id": "eth", "symbol": "eth", "name": "Ethereum",
                "market_cap": 500.0, "current_price": null
            },
            { "symbol": "???", "name": "No id" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let coins = client_for(&server).fetch_market_list(3).await.unwrap();
    let ids: Vec<_> = coins.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["btc", "eth"]);
    assert_eq!(coins[1].current_price, 0.0);

    let by_price = sort(&coins, SortKey::CurrentPrice, SortDirection::Descending);
    assert_eq!(by_price.last().map(|c| c.id.as_str()), Some("eth"));

    let asc = sort(&coins, SortKey::MarketCap, SortDirection::Ascending);
    assert_eq!(asc[0].id, "eth");
}

#[tokio::test]
async fn empty_market_list_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coins/markets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    assert!(client_for(&server).fetch_market_list(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn rate_limit_is_reported_as_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coins/markets"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_market_list(10).await.unwrap_err();
    match &err {
        FetchError::Status { status, body } => {
            assert_eq!(*status, 429);
            assert_eq!(body, "slow down");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_transient());
}

#[tokio::test]
async fn garbage_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coins/markets"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    assert!(matches!(
        client_for(&server).fetch_market_list(10).await,
        Err(FetchError::Decode(_))
    ));
}

#[tokio::test]
async fn unreachable_provider_is_a_transport_error() {
    // Nothing listens on the discard port locally.
    let client = MarketClient::new(ClientConfig::with_base_url("http://127.0.0.1:9"));
    assert!(matches!(
        client.fetch_market_list(10).await,
        Err(FetchError::Transport(_))
    ));
}

#[tokio::test]
async fn search_reads_coins_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", "bit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "coins": [
                {
                    "id": "bitcoin", "name": "Bitcoin", "symbol": "BTC",
                    "market_cap_rank": 1, "thumb": "b.png"
                },
                { "id": "bittensor", "name": "Bittensor", "symbol": "TAO", "market_cap_rank": null }
            ],
            "exchanges": []
        })))
        .mount(&server)
        .await;

    let results = client_for(&server).search(" bit ").await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].market_cap_rank, Some(1));
    assert_eq!(results[1].thumb, None);
}

#[tokio::test]
async fn search_without_coins_field_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    assert!(client_for(&server).search("zzz").await.unwrap().is_empty());
}

#[tokio::test]
async fn details_use_market_data_in_configured_currency() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coins/ethereum"))
        .and(query_param("market_data", "true"))
        .and(query_param("tickers", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "ethereum",
            "symbol": "eth",
            "name": "Ethereum",
            "market_cap_rank": 2,
            "market_data": {
                "current_price": { "usd": 3000.0 },
                "market_cap": { "usd": 3.6e11 },
                "total_volume": { "usd": 1.5e10 },
                "price_change_percentage_24h": -2.5,
                "price_change_24h": -75.0,
                "circulating_supply": 1.2e8,
                "max_supply": null
            }
        })))
        .mount(&server)
        .await;

    let coin = client_for(&server)
        .fetch_details("ethereum")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(coin.current_price, 3000.0);
    assert_eq!(coin.market_cap_rank, Some(2));
    assert!(!coin.is_gaining());
    assert_eq!(coin.max_supply, None);
}

#[tokio::test]
async fn unknown_coin_is_absent_but_server_error_is_not() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coins/nope"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "error": "coin not found" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/coins/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.fetch_details("nope").await.unwrap(), None);
    assert!(matches!(
        client.fetch_details("broken").await,
        Err(FetchError::Status { status: 500, .. })
    ));
}

#[tokio::test]
async fn price_history_is_chronological() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coins/bitcoin/market_chart"))
        .and(query_param("vs_currency", "usd"))
        .and(query_param("days", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "prices": [[1700000100000u64, 2.0], [1700000000000u64, 1.0]],
            "market_caps": [],
            "total_volumes": []
        })))
        .mount(&server)
        .await;

    let history = client_for(&server)
        .fetch_price_history("bitcoin", 7)
        .await
        .unwrap();
    let prices: Vec<f64> = history.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![1.0, 2.0]);
    assert!(history[0].timestamp < history[1].timestamp);
}

#[tokio::test]
async fn base_url_trailing_slash_is_tolerated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "coins": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = MarketClient::new(ClientConfig::with_base_url(format!("{}/", server.uri())));
    assert!(client.search("x").await.unwrap().is_empty());
}

#[tokio::test]
async fn detail_of_delisted_coin_falls_back_to_market_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coins/markets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "delisted", "symbol": "dls", "name": "Delisted", "current_price": 0.5 }
        ])))
        .mount(&server)
        .await;
    for gone in ["/coins/delisted", "/coins/delisted/market_chart"] {
        Mock::given(method("GET"))
            .and(path(gone))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "error": "coin not found" })),
            )
            .mount(&server)
            .await;
    }

    let store = PersistenceStore::new(MemoryStore::new(), StoreKeys::default());
    let mut app = App::new(client_for(&server), store);
    app.refresh_market(10).await.unwrap();

    let detail = app.open_detail("delisted").await.unwrap();
    assert_eq!(detail.coin.map(|c| c.id), Some("delisted".to_string()));
    assert!(detail.history.is_empty());
    assert!(!detail.in_watchlist);

    let unknown = app.open_detail("unknown").await.unwrap();
    assert_eq!(unknown.coin, None);
    assert!(unknown.history.is_empty());
}
