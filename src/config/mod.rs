use crate::error::{PriceBoardError, Result};
use crate::models::CurrencyCode;
use std::env;
use std::time::Duration;

const DEFAULT_CURRENCIES: &str = "usd,eur,rub,gbp,jpy,cny";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub coingecko_base_url: String,
    pub request_timeout_secs: u64,
    pub currencies: Vec<CurrencyCode>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .unwrap_or_else(|| "5000".to_string())
            .parse::<u16>()
            .map_err(|_| PriceBoardError::ConfigError("Invalid PORT".to_string()))?;

        let request_timeout_secs = lookup("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u64>()
            .map_err(|_| PriceBoardError::ConfigError("Invalid REQUEST_TIMEOUT_SECS".to_string()))?;

        if request_timeout_secs == 0 {
            return Err(PriceBoardError::ConfigError(
                "REQUEST_TIMEOUT_SECS must be positive".to_string(),
            ));
        }

        let currencies = parse_currencies(
            &lookup("CURRENCIES").unwrap_or_else(|| DEFAULT_CURRENCIES.to_string()),
        )?;

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            coingecko_base_url: lookup("COINGECKO_BASE_URL")
                .unwrap_or_else(|| "https://api.coingecko.com/api/v3".to_string())
                .trim_end_matches('/')
                .to_string(),
            request_timeout_secs,
            currencies,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_currencies(raw: &str) -> Result<Vec<CurrencyCode>> {
    let mut currencies = Vec::new();
    for part in raw.split(',').filter(|part| !part.trim().is_empty()) {
        let code = part.parse::<CurrencyCode>()?;
        if !currencies.contains(&code) {
            currencies.push(code);
        }
    }

    if currencies.is_empty() {
        return Err(PriceBoardError::ConfigError("CURRENCIES is empty".to_string()));
    }
    Ok(currencies)
}
