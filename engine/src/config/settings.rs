// Screener settings, loaded from an optional JSON file
use serde::Deserialize;
use shared::models::{Lookback, Thresholds};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{EngineError, Result};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ScreenerSettings {
    pub thresholds: Thresholds,
    /// Pause between tickers to stay under the data source's call-rate limits.
    pub pacing_delay_ms: u64,
    pub lookback_months: u32,
    pub price_data_dir: PathBuf,
    pub fundamentals_file: PathBuf,
    pub sp500_file: PathBuf,
}

impl Default for ScreenerSettings {
    fn default() -> Self {
        ScreenerSettings {
            thresholds: Thresholds::default(),
            pacing_delay_ms: 300,
            lookback_months: 6,
            price_data_dir: PathBuf::from("data/prices"),
            fundamentals_file: PathBuf::from("data/fundamentals.json"),
            sp500_file: PathBuf::from("data/sp500.csv"),
        }
    }
}

impl ScreenerSettings {
    /// Reads settings from `path`, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    EngineError::ConfigError(format!("Failed to read '{}': {}", path.display(), e))
                })?;
                serde_json::from_str::<ScreenerSettings>(&raw).map_err(|e| {
                    EngineError::ConfigError(format!("Invalid settings in '{}': {}", path.display(), e))
                })?
            }
            None => ScreenerSettings::default(),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        let limits = [
            ("rsi_max", t.rsi_max),
            ("pe_max", t.pe_max),
            ("pb_max", t.pb_max),
            ("roe_min", t.roe_min),
            ("de_max", t.de_max),
        ];
        if let Some((name, _)) = limits.iter().find(|(_, v)| !v.is_finite()) {
            return Err(EngineError::ConfigError(format!("Threshold '{}' must be a finite number", name)));
        }
        if self.lookback_months == 0 {
            return Err(EngineError::ConfigError("lookback_months must be greater than 0".to_string()));
        }
        Ok(())
    }

    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }

    pub fn lookback(&self) -> Lookback {
        Lookback::months(self.lookback_months)
    }

    /// Points every data file at `dir`, keeping the default file names.
    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        self.price_data_dir = dir.join("prices");
        self.fundamentals_file = dir.join("fundamentals.json");
        self.sp500_file = dir.join("sp500.csv");
        self
    }
}
