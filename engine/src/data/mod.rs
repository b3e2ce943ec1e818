// Collaborators supplying tickers, prices and fundamentals
pub mod csv_parser;
pub mod file_source;
pub mod market_data;
pub mod universe;

pub use file_source::FileMarketData;
pub use market_data::MarketDataStore;
pub use universe::{StaticUniverse, Universe};

use async_trait::async_trait;
use shared::models::{FundamentalSnapshot, Interval, Lookback, PriceSeries};

use crate::error::Result;

#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// An empty series or `EngineError::DataUnavailable` means there is nothing to score.
    async fn fetch_price_series(&self, ticker: &str, lookback: Lookback, interval: Interval) -> Result<PriceSeries>;

    async fn fetch_fundamentals(&self, ticker: &str) -> Result<FundamentalSnapshot>;
}

#[async_trait]
pub trait TickerUniverseSource: Send + Sync {
    async fn list_sp500(&self) -> Result<Vec<String>>;

    fn list_europe(&self) -> Vec<String>;

    async fn list(&self, universe: Universe) -> Result<Vec<String>> {
        match universe {
            Universe::Sp500 => self.list_sp500().await,
            Universe::Europe => Ok(self.list_europe()),
        }
    }
}
