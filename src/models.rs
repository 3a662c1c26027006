use crate::error::PriceBoardError;
use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Number of points every history series carries, real or synthetic.
pub const HISTORY_LEN: usize = 10;

/// Quote currencies the board knows how to request and display.
///
/// Ordering follows declaration order, which is also the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyCode {
    Usd,
    Eur,
    Rub,
    Gbp,
    Jpy,
    Cny,
}

impl CurrencyCode {
    pub const ALL: [CurrencyCode; 6] = [
        CurrencyCode::Usd,
        CurrencyCode::Eur,
        CurrencyCode::Rub,
        CurrencyCode::Gbp,
        CurrencyCode::Jpy,
        CurrencyCode::Cny,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyCode::Usd => "usd",
            CurrencyCode::Eur => "eur",
            CurrencyCode::Rub => "rub",
            CurrencyCode::Gbp => "gbp",
            CurrencyCode::Jpy => "jpy",
            CurrencyCode::Cny => "cny",
        }
    }

    /// Uppercase label used on the rendered page.
    pub fn label(&self) -> String {
        self.as_str().to_ascii_uppercase()
    }

    /// Key the upstream uses for this currency's 24h change.
    pub fn change_key(&self) -> String {
        format!("{}_24h_change", self.as_str())
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = PriceBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        CurrencyCode::ALL
            .into_iter()
            .find(|code| code.as_str() == normalized)
            .ok_or_else(|| PriceBoardError::ConfigError(format!("Unknown currency code: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrencyQuote {
    pub price: f64,
    /// Percent change over the last 24 hours.
    pub change_24h: f64,
}

/// Spot prices for the tracked asset, keyed by quote currency.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceQuote {
    pub entries: BTreeMap<CurrencyCode, CurrencyQuote>,
    pub last_updated_at: Option<i64>,
}

impl PriceQuote {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, code: CurrencyCode) -> Option<&CurrencyQuote> {
        self.entries.get(&code)
    }
}

// Serialized in the flat upstream shape so API consumers see the familiar
// `usd` / `usd_24h_change` / `last_updated_at` keys.
impl Serialize for PriceQuote {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.entries.len() * 2 + usize::from(self.last_updated_at.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        for (code, quote) in &self.entries {
            map.serialize_entry(code.as_str(), &quote.price)?;
            map.serialize_entry(&code.change_key(), &quote.change_24h)?;
        }
        if let Some(updated) = self.last_updated_at {
            map.serialize_entry("last_updated_at", &updated)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPoint {
    #[serde(serialize_with = "serialize_day_month")]
    pub date: NaiveDate,
    pub price: f64,
}

impl HistoryPoint {
    /// Chart label, `dd.mm`.
    pub fn label(&self) -> String {
        self.date.format("%d.%m").to_string()
    }
}

fn serialize_day_month<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format("%d.%m"))
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, timestamp: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Some(timestamp),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn currency_codes_parse_case_insensitively() {
        assert_eq!("usd".parse::<CurrencyCode>().unwrap(), CurrencyCode::Usd);
        assert_eq!(" RUB ".parse::<CurrencyCode>().unwrap(), CurrencyCode::Rub);
        assert!("btc".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn price_quote_serializes_in_upstream_shape() {
        let mut quote = PriceQuote::default();
        quote.entries.insert(
            CurrencyCode::Usd,
            CurrencyQuote { price: 65000.5, change_24h: -1.25 },
        );
        quote.entries.insert(
            CurrencyCode::Eur,
            CurrencyQuote { price: 60000.0, change_24h: 0.5 },
        );
        quote.last_updated_at = Some(1_700_000_000);

        let value = serde_json::to_value(&quote).unwrap();
        assert_eq!(
            value,
            json!({
                "usd": 65000.5,
                "usd_24h_change": -1.25,
                "eur": 60000.0,
                "eur_24h_change": 0.5,
                "last_updated_at": 1_700_000_000
            })
        );
    }

    #[test]
    fn history_point_serializes_day_month() {
        let point = HistoryPoint {
            date: NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
            price: 45000.0,
        };
        assert_eq!(
            serde_json::to_value(&point).unwrap(),
            json!({"date": "07.03", "price": 45000.0})
        );
        assert_eq!(point.label(), "07.03");
    }

    #[test]
    fn error_envelope_omits_data_and_timestamp() {
        let response: ApiResponse<PriceQuote> =
            ApiResponse::error("Failed to fetch Bitcoin price".to_string());
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"success": false, "error": "Failed to fetch Bitcoin price"})
        );
    }
}
