use const_format::concatcp;

// Root
pub const COINGECKO_HOST: &str = "https://api.coingecko.com";
pub const COINGECKO_API_VERSION: &str = "/api/v3";
pub const COINGECKO_API_URL: &str = concatcp!(COINGECKO_HOST, COINGECKO_API_VERSION);

// Paths
pub const COINGECKO_MARKETS_PATH: &str = "/coins/markets";
pub const COINGECKO_SEARCH_PATH: &str = "/search";
pub const COINGECKO_COINS_PATH: &str = "/coins";
pub const COINGECKO_MARKET_CHART_PATH: &str = "/market_chart";
