use thiserror::Error;

#[derive(Error, Debug)]
pub enum PriceBoardError {
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for PriceBoardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PriceBoardError::UpstreamUnavailable(format!("request timed out: {}", err))
        } else {
            PriceBoardError::UpstreamUnavailable(format!("HTTP request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for PriceBoardError {
    fn from(err: serde_json::Error) -> Self {
        PriceBoardError::UpstreamUnavailable(format!("JSON parsing failed: {}", err))
    }
}

impl PriceBoardError {
    pub fn is_upstream_unavailable(&self) -> bool {
        matches!(self, PriceBoardError::UpstreamUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, PriceBoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_are_upstream_failures() {
        let err: PriceBoardError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(err.is_upstream_unavailable());
        assert!(err.to_string().starts_with("Upstream unavailable: JSON parsing failed"));
    }

    #[test]
    fn config_errors_are_not_upstream_failures() {
        let err = PriceBoardError::ConfigError("Invalid PORT".to_string());
        assert!(!err.is_upstream_unavailable());
        assert_eq!(err.to_string(), "Configuration error: Invalid PORT");
    }
}
