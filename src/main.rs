use anyhow::Result;
use btc_price_board::api::CoinGeckoClient;
use btc_price_board::clock::SystemClock;
use btc_price_board::config::Config;
use btc_price_board::handlers::{router, serve, AppState};
use btc_price_board::price_board::PriceBoard;
use dotenv::dotenv;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv().ok();

    let config = Config::from_env()?;
    let source = CoinGeckoClient::new(&config)?;
    let board = PriceBoard::new(
        Arc::new(source),
        Arc::new(SystemClock),
        config.currencies.clone(),
    );

    let state = Arc::new(AppState { board });
    let app = router(state);

    let addr = config.bind_addr();
    info!(
        "Starting BTC price board on {} (upstream {}, timeout {}s)",
        addr, config.coingecko_base_url, config.request_timeout_secs
    );

    serve(app, &addr).await?;

    Ok(())
}
