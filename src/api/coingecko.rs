use crate::api::{MarketChartResponse, MarketSource, SimplePriceResponse};
use crate::config::Config;
use crate::error::{PriceBoardError, Result};
use crate::models::CurrencyCode;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

const USER_AGENT: &str = concat!("btc-price-board/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PriceBoardError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.coingecko_base_url.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, params: &[(&str, String)]) -> Result<T> {
        debug!("Fetching from CoinGecko: {} {:?}", url, params);

        let response = self.client.get(url).query(params).send().await?;

        if !response.status().is_success() {
            return Err(PriceBoardError::UpstreamUnavailable(format!(
                "CoinGecko API returned status: {}",
                response.status()
            )));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            error!("CoinGecko raw response: {}", text);
            PriceBoardError::from(e)
        })
    }
}

#[async_trait]
impl MarketSource for CoinGeckoClient {
    async fn simple_price(
        &self,
        asset_id: &str,
        vs_currencies: &[CurrencyCode],
    ) -> Result<SimplePriceResponse> {
        let url = format!("{}/simple/price", self.base_url);
        let params = [
            ("ids", asset_id.to_string()),
            ("vs_currencies", join_codes(vs_currencies)),
            ("include_24hr_change", "true".to_string()),
            ("include_last_updated_at", "true".to_string()),
        ];
        self.get_json(&url, &params).await
    }

    async fn market_chart(
        &self,
        asset_id: &str,
        vs_currency: CurrencyCode,
        days: u32,
    ) -> Result<MarketChartResponse> {
        let url = format!("{}/coins/{}/market_chart", self.base_url, asset_id);
        let params = [
            ("vs_currency", vs_currency.to_string()),
            ("days", days.to_string()),
            ("interval", "daily".to_string()),
        ];
        self.get_json(&url, &params).await
    }
}

fn join_codes(codes: &[CurrencyCode]) -> String {
    codes
        .iter()
        .map(CurrencyCode::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_codes_are_comma_joined() {
        assert_eq!(join_codes(&CurrencyCode::ALL), "usd,eur,rub,gbp,jpy,cny");
        assert_eq!(join_codes(&[CurrencyCode::Gbp]), "gbp");
    }

    #[test]
    fn client_builds_from_default_config() {
        let config = Config::from_lookup(|_| None).unwrap();
        let client = CoinGeckoClient::new(&config).unwrap();
        assert_eq!(client.base_url, "https://api.coingecko.com/api/v3");
    }

    #[tokio::test]
    async fn unreachable_host_is_upstream_unavailable() {
        let config = Config::from_lookup(|key| match key {
            "COINGECKO_BASE_URL" => Some("http://127.0.0.1:1".to_string()),
            "REQUEST_TIMEOUT_SECS" => Some("2".to_string()),
            _ => None,
        })
        .unwrap();
        let client = CoinGeckoClient::new(&config).unwrap();

        let err = client
            .simple_price("bitcoin", &[CurrencyCode::Usd])
            .await
            .unwrap_err();
        assert!(err.is_upstream_unavailable());
    }

    // Hits the live API; run manually.
    #[tokio::test]
    #[ignore]
    async fn test_real_coingecko_api() {
        let config = Config::from_lookup(|_| None).unwrap();
        let client = CoinGeckoClient::new(&config).unwrap();
        match client.simple_price("bitcoin", &CurrencyCode::ALL).await {
            Ok(body) => println!("CoinGecko response: {:?}", body.get("bitcoin")),
            Err(e) => println!("CoinGecko call failed (this might be expected): {}", e),
        }
    }
}
