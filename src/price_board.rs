use crate::api::MarketSource;
use crate::clock::Clock;
use crate::error::{PriceBoardError, Result};
use crate::models::{CurrencyCode, CurrencyQuote, HistoryPoint, PriceQuote, HISTORY_LEN};
use crate::sample::generate_sample_history;
use chrono::DateTime;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const ASSET_ID: &str = "bitcoin";
pub const HISTORY_DAYS: u32 = 30;
pub const HISTORY_CURRENCY: CurrencyCode = CurrencyCode::Usd;
const DOWNSAMPLE_STEP: usize = 3;

/// Retrieves and normalizes spot prices and chart history for the tracked asset.
///
/// Holds no per-request state; every call goes to the upstream source once.
pub struct PriceBoard {
    source: Arc<dyn MarketSource>,
    clock: Arc<dyn Clock>,
    currencies: Vec<CurrencyCode>,
}

impl PriceBoard {
    pub fn new(
        source: Arc<dyn MarketSource>,
        clock: Arc<dyn Clock>,
        currencies: Vec<CurrencyCode>,
    ) -> Self {
        Self {
            source,
            clock,
            currencies,
        }
    }

    pub fn currencies(&self) -> &[CurrencyCode] {
        &self.currencies
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Current prices in every configured currency, in one upstream call.
    ///
    /// An empty quote means upstream knew nothing about the asset; callers
    /// treat it the same as an error.
    pub async fn fetch_spot_prices(&self) -> Result<PriceQuote> {
        let body = self
            .source
            .simple_price(ASSET_ID, &self.currencies)
            .await
            .map_err(|e| {
                error!("Failed to fetch {} price: {}", ASSET_ID, e);
                e
            })?;

        let quote = normalize_quote(body.get(ASSET_ID), &self.currencies);
        if quote.is_empty() {
            warn!("Upstream returned no prices for {}", ASSET_ID);
        } else {
            info!("Fetched {} price in {} currencies", ASSET_ID, quote.entries.len());
        }
        Ok(quote)
    }

    /// Last 30 days of prices, downsampled to exactly ten points.
    ///
    /// Never fails: any upstream problem is logged and replaced by sample data.
    pub async fn fetch_history(&self) -> Vec<HistoryPoint> {
        match self.try_fetch_history().await {
            Ok(history) => history,
            Err(e) => {
                warn!("Failed to fetch price history, using sample data: {}", e);
                generate_sample_history(self.clock.now().date_naive())
            }
        }
    }

    async fn try_fetch_history(&self) -> Result<Vec<HistoryPoint>> {
        let chart = self
            .source
            .market_chart(ASSET_ID, HISTORY_CURRENCY, HISTORY_DAYS)
            .await?;
        let history = downsample_history(&chart.prices)?;
        info!(
            "Fetched {} raw history samples, kept {}",
            chart.prices.len(),
            history.len()
        );
        Ok(history)
    }
}

/// Keeps only requested currencies that upstream actually priced.
pub fn normalize_quote(
    raw: Option<&HashMap<String, Option<f64>>>,
    currencies: &[CurrencyCode],
) -> PriceQuote {
    let Some(raw) = raw else {
        return PriceQuote::default();
    };

    let mut quote = PriceQuote {
        last_updated_at: raw
            .get("last_updated_at")
            .copied()
            .flatten()
            .map(|ts| ts as i64),
        ..PriceQuote::default()
    };

    for &code in currencies {
        let Some(price) = raw.get(code.as_str()).copied().flatten() else {
            continue;
        };
        let change_24h = raw.get(&code.change_key()).copied().flatten().unwrap_or(0.0);
        quote.entries.insert(code, CurrencyQuote { price, change_24h });
    }
    quote
}

/// Keeps every third sample and returns the last ten of those.
pub fn downsample_history(samples: &[Vec<f64>]) -> Result<Vec<HistoryPoint>> {
    let mut points = samples
        .iter()
        .step_by(DOWNSAMPLE_STEP)
        .map(|sample| to_history_point(sample))
        .collect::<Result<Vec<_>>>()?;

    if points.len() < HISTORY_LEN {
        return Err(PriceBoardError::UpstreamUnavailable(format!(
            "only {} history points after downsampling {} samples",
            points.len(),
            samples.len()
        )));
    }

    Ok(points.split_off(points.len() - HISTORY_LEN))
}

fn to_history_point(sample: &[f64]) -> Result<HistoryPoint> {
    let &[timestamp_ms, price] = sample else {
        return Err(PriceBoardError::UpstreamUnavailable(format!(
            "malformed history sample: {:?}",
            sample
        )));
    };

    let date = Some(timestamp_ms)
        .filter(|ms| ms.is_finite())
        .and_then(|ms| DateTime::from_timestamp_millis(ms as i64))
        .ok_or_else(|| {
            PriceBoardError::UpstreamUnavailable(format!(
                "invalid history timestamp: {}",
                timestamp_ms
            ))
        })?;

    Ok(HistoryPoint {
        date: date.date_naive(),
        price: round_cents(price),
    })
}

// Exact halfway values round to the even cent.
fn round_cents(price: f64) -> f64 {
    format!("{:.2}", price).parse().unwrap_or(price)
}
