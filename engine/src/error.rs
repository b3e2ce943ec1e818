use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Ticker universe unavailable: {0}")]
    UniverseLoadError(String),

    // Empty or missing price history. Skipped without a warning.
    #[error("No price data for '{0}'")]
    DataUnavailable(String),

    #[error("Market data error: {0}")]
    MarketDataError(String),

    #[error("Fundamentals lookup failed: {0}")]
    FundamentalsError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

impl EngineError {
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, EngineError::DataUnavailable(_))
    }
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_unavailable_is_distinguished() {
        assert!(EngineError::DataUnavailable("AAPL".to_string()).is_data_unavailable());
        assert!(!EngineError::MarketDataError("timeout".to_string()).is_data_unavailable());
    }

    #[test]
    fn test_messages_carry_context() {
        let err = EngineError::UniverseLoadError("sp500.csv missing".to_string());
        assert_eq!(err.to_string(), "Ticker universe unavailable: sp500.csv missing");
        let err = EngineError::DataUnavailable("NVO".to_string());
        assert_eq!(err.to_string(), "No price data for 'NVO'");
    }
}
