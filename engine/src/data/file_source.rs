// Market data read from local files: one price CSV per ticker plus a JSON fundamentals map
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use shared::models::{FundamentalSnapshot, Interval, Lookback, PriceSeries};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::csv_parser::PriceCsvParser;
use super::MarketDataSource;
use crate::error::{EngineError, Result};

pub struct FileMarketData {
    price_dir: PathBuf,
    // Raw per-ticker entries; each is decoded on lookup.
    fundamentals: HashMap<String, Value>,
}

impl FileMarketData {
    /// A missing fundamentals file is not fatal; every lookup then fails per ticker.
    pub fn open(price_dir: &Path, fundamentals_file: &Path) -> Result<Self> {
        let fundamentals = if fundamentals_file.exists() {
            let raw = std::fs::read_to_string(fundamentals_file)?;
            serde_json::from_str::<HashMap<String, Value>>(&raw)?
        } else {
            tracing::warn!(path = %fundamentals_file.display(), "Fundamentals file not found, fundamental checks will fail");
            HashMap::new()
        };

        tracing::info!(
            price_dir = %price_dir.display(),
            fundamentals = fundamentals.len(),
            "File market data ready"
        );

        Ok(Self {
            price_dir: price_dir.to_path_buf(),
            fundamentals,
        })
    }

    fn price_file(&self, ticker: &str) -> PathBuf {
        self.price_dir.join(format!("{}.csv", ticker))
    }
}

#[async_trait]
impl MarketDataSource for FileMarketData {
    async fn fetch_price_series(&self, ticker: &str, lookback: Lookback, interval: Interval) -> Result<PriceSeries> {
        if interval != Interval::Day1 {
            return Err(EngineError::MarketDataError(format!(
                "Only daily bars are stored on disk, requested {:?}",
                interval
            )));
        }

        let path = self.price_file(ticker);
        if !path.exists() {
            return Err(EngineError::DataUnavailable(ticker.to_string()));
        }

        let ticker_owned = ticker.to_string();
        let series = tokio::task::spawn_blocking(move || PriceCsvParser::load_series_from_csv(&path, &ticker_owned))
            .await
            .map_err(|e| EngineError::MarketDataError(format!("Price loader task failed: {}", e)))??;

        Ok(series.within(lookback))
    }

    async fn fetch_fundamentals(&self, ticker: &str) -> Result<FundamentalSnapshot> {
        let entry = self
            .fundamentals
            .get(ticker)
            .ok_or_else(|| EngineError::FundamentalsError(format!("No fundamentals for '{}'", ticker)))?;

        FundamentalSnapshot::deserialize(entry)
            .map_err(|e| EngineError::FundamentalsError(format!("Malformed fundamentals for '{}': {}", ticker, e)))
    }
}
