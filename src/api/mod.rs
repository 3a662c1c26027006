pub mod coingecko;

pub use coingecko::CoinGeckoClient;

use crate::error::Result;
use crate::models::CurrencyCode;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

/// `/simple/price` body: asset id -> field -> value. Fields are the currency
/// codes, `<code>_24h_change` and `last_updated_at`; any of them may be null.
pub type SimplePriceResponse = HashMap<String, HashMap<String, Option<f64>>>;

/// `/coins/{id}/market_chart` body. Only the price series is used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketChartResponse {
    /// `[millisecond timestamp, price]` samples, oldest first.
    pub prices: Vec<Vec<f64>>,
}

/// Upstream market data endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketSource: Send + Sync {
    async fn simple_price(
        &self,
        asset_id: &str,
        vs_currencies: &[CurrencyCode],
    ) -> Result<SimplePriceResponse>;

    async fn market_chart(
        &self,
        asset_id: &str,
        vs_currency: CurrencyCode,
        days: u32,
    ) -> Result<MarketChartResponse>;
}
