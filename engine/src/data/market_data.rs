// In-memory market data, keyed by ticker
use async_trait::async_trait;
use shared::models::{Bar, FundamentalSnapshot, Interval, Lookback, PriceSeries};
use std::collections::HashMap;

use super::MarketDataSource;
use crate::error::{EngineError, Result};

pub struct MarketDataStore {
    bars: HashMap<String, HashMap<Interval, Vec<Bar>>>,
    fundamentals: HashMap<String, FundamentalSnapshot>,
}

impl MarketDataStore {
    pub fn new() -> Self {
        MarketDataStore {
            bars: HashMap::new(),
            fundamentals: HashMap::new(),
        }
    }

    /// Merges bars for `ticker`, keeping them sorted with one bar per date.
    pub fn add_bars(&mut self, ticker: &str, interval: Interval, new_bars: Vec<Bar>) {
        let stored = self
            .bars
            .entry(ticker.to_string())
            .or_default()
            .entry(interval)
            .or_default();

        // Newer bars win on duplicate dates.
        let mut merged = new_bars;
        merged.append(stored);
        merged.sort_by_key(|b| b.date);
        merged.dedup_by_key(|b| b.date);
        *stored = merged;
    }

    pub fn add_series(&mut self, series: PriceSeries) {
        let ticker = series.ticker.clone();
        self.add_bars(&ticker, series.interval, series.bars().to_vec());
    }

    pub fn set_fundamentals(&mut self, ticker: &str, snapshot: FundamentalSnapshot) {
        self.fundamentals.insert(ticker.to_string(), snapshot);
    }

    pub fn get_series(&self, ticker: &str, interval: Interval) -> Option<PriceSeries> {
        self.bars
            .get(ticker)
            .and_then(|by_interval| by_interval.get(&interval))
            .map(|bars| PriceSeries::new(ticker, interval, bars.clone()))
    }

    pub fn tickers(&self) -> Vec<String> {
        let mut tickers: Vec<String> = self.bars.keys().cloned().collect();
        tickers.sort();
        tickers
    }
}

impl Default for MarketDataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataSource for MarketDataStore {
    async fn fetch_price_series(&self, ticker: &str, lookback: Lookback, interval: Interval) -> Result<PriceSeries> {
        self.get_series(ticker, interval)
            .map(|series| series.without_incomplete_bars().within(lookback))
            .ok_or_else(|| EngineError::DataUnavailable(ticker.to_string()))
    }

    async fn fetch_fundamentals(&self, ticker: &str) -> Result<FundamentalSnapshot> {
        self.fundamentals
            .get(ticker)
            .copied()
            .ok_or_else(|| EngineError::FundamentalsError(format!("No fundamentals for '{}'", ticker)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 10.0,
        }
    }

    #[test]
    fn test_add_bars_merges_and_replaces_duplicates() {
        let mut store = MarketDataStore::new();
        store.add_bars("ASML.AS", Interval::Day1, vec![bar(2, 2.0), bar(1, 1.0)]);
        store.add_bars("ASML.AS", Interval::Day1, vec![bar(2, 20.0), bar(3, 3.0)]);

        let series = store.get_series("ASML.AS", Interval::Day1).unwrap();
        let closes: Vec<f64> = series.bars().iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![1.0, 20.0, 3.0]);
        assert!(store.get_series("ASML.AS", Interval::Week1).is_none());
        assert_eq!(store.tickers(), vec!["ASML.AS".to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_unknown_ticker_is_data_unavailable() {
        let store = MarketDataStore::new();
        let err = store
            .fetch_price_series("NOPE", Lookback::SIX_MONTHS, Interval::Day1)
            .await
            .unwrap_err();
        assert!(err.is_data_unavailable());
    }

    #[tokio::test]
    async fn test_fetch_fundamentals() {
        let mut store = MarketDataStore::new();
        let snapshot = FundamentalSnapshot {
            pe: Some(15.0),
            ..Default::default()
        };
        store.set_fundamentals("SAP.DE", snapshot);

        assert_eq!(store.fetch_fundamentals("SAP.DE").await.unwrap(), snapshot);
        assert!(matches!(
            store.fetch_fundamentals("BMW.DE").await,
            Err(EngineError::FundamentalsError(_))
        ));
    }
}
