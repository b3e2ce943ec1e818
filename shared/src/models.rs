use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::utils::{format_decimal, format_percent, format_threshold, pass_icon};

/// One daily OHLCV bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// A bar is usable when every numeric field is finite.
    pub fn is_complete(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .all(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Interval {
    Day1,
    Week1,
}

/// How far back a price series reaches, in calendar months.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Lookback {
    pub months: u32,
}

impl Lookback {
    pub const SIX_MONTHS: Lookback = Lookback { months: 6 };

    pub fn months(months: u32) -> Self {
        Self { months }
    }

    /// First date (exclusive) of the window ending at `end`.
    pub fn window_start(&self, end: NaiveDate) -> NaiveDate {
        end.checked_sub_months(Months::new(self.months))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl Default for Lookback {
    fn default() -> Self {
        Self::SIX_MONTHS
    }
}

/// Ordered daily bars for one ticker. Ascending by date, no duplicate dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    pub ticker: String,
    pub interval: Interval,
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(ticker: impl Into<String>, interval: Interval, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Self {
            ticker: ticker.into(),
            interval,
            bars,
        }
    }

    pub fn empty(ticker: impl Into<String>, interval: Interval) -> Self {
        Self::new(ticker, interval, Vec::new())
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Drops bars carrying missing (non-finite) values.
    pub fn without_incomplete_bars(mut self) -> Self {
        self.bars.retain(Bar::is_complete);
        self
    }

    /// Keeps only the bars inside `lookback`, measured back from the newest bar.
    pub fn within(mut self, lookback: Lookback) -> Self {
        if let Some(end) = self.bars.last().map(|b| b.date) {
            let start = lookback.window_start(end);
            self.bars.retain(|b| b.date > start);
        }
        self
    }
}

/// The fundamental ratios screened per ticker. Any of them may be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalSnapshot {
    #[serde(default, alias = "trailingPE", alias = "P/E")]
    pub pe: Option<f64>,
    #[serde(default, alias = "priceToBook", alias = "P/B")]
    pub pb: Option<f64>,
    #[serde(default, alias = "returnOnEquity", alias = "ROE")]
    pub roe: Option<f64>,
    #[serde(default, alias = "debtToEquity", alias = "D/E")]
    pub de: Option<f64>,
}

impl FundamentalSnapshot {
    pub fn get(&self, ratio: Ratio) -> Option<f64> {
        let value = match ratio {
            Ratio::PriceToEarnings => self.pe,
            Ratio::PriceToBook => self.pb,
            Ratio::ReturnOnEquity => self.roe,
            Ratio::DebtToEquity => self.de,
        };
        value.filter(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Ratio {
    PriceToEarnings,
    PriceToBook,
    ReturnOnEquity,
    DebtToEquity,
}

impl Ratio {
    pub const ALL: [Ratio; 4] = [
        Ratio::PriceToEarnings,
        Ratio::PriceToBook,
        Ratio::ReturnOnEquity,
        Ratio::DebtToEquity,
    ];

    pub fn short_name(&self) -> &'static str {
        match self {
            Ratio::PriceToEarnings => "P/E",
            Ratio::PriceToBook => "P/B",
            Ratio::ReturnOnEquity => "ROE",
            Ratio::DebtToEquity => "D/E",
        }
    }

    /// D/E is reported but never decides the fundamental verdict.
    pub fn is_required(&self) -> bool {
        !matches!(self, Ratio::DebtToEquity)
    }

    /// True when `value` satisfies this ratio's threshold.
    pub fn within(&self, value: f64, thresholds: &Thresholds) -> bool {
        match self {
            Ratio::PriceToEarnings => value < thresholds.pe_max,
            Ratio::PriceToBook => value < thresholds.pb_max,
            Ratio::ReturnOnEquity => value > thresholds.roe_min,
            Ratio::DebtToEquity => value < thresholds.de_max,
        }
    }

    pub fn format_value(&self, value: f64) -> String {
        match self {
            Ratio::ReturnOnEquity => format_percent(value, 1),
            _ => format_decimal(value, 2),
        }
    }

    pub fn column_label(&self, thresholds: &Thresholds) -> String {
        match self {
            Ratio::PriceToEarnings => format!("P/E (<{})", format_threshold(thresholds.pe_max)),
            Ratio::PriceToBook => format!("P/B (<{})", format_threshold(thresholds.pb_max)),
            Ratio::ReturnOnEquity => format!("ROE (>{})", format_percent(thresholds.roe_min, 0)),
            Ratio::DebtToEquity => format!(
                "D/E (<{}) (optional)",
                format_threshold(thresholds.de_max)
            ),
        }
    }
}

/// Screening limits. Fixed for the duration of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub rsi_max: f64,
    pub pe_max: f64,
    pub pb_max: f64,
    pub roe_min: f64,
    pub de_max: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            rsi_max: 55.0,
            pe_max: 30.0,
            pb_max: 3.0,
            roe_min: 0.10,
            de_max: 4.0,
        }
    }
}

/// Latest-bar indicator values. `None` means the indicator could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub price: f64,
    pub volume: f64,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub sma50: Option<f64>,
    pub volume_avg20: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalReport {
    pub snapshot: IndicatorSnapshot,
    pub rsi_pass: bool,
    pub macd_above_signal: bool,
    pub price_above_sma50: bool,
    /// Informational only.
    pub volume_above_avg20: bool,
}

impl TechnicalReport {
    pub fn passed(&self) -> bool {
        self.rsi_pass && self.macd_above_signal && self.price_above_sma50
    }

    pub fn rsi_display(&self) -> String {
        match self.snapshot.rsi {
            Some(rsi) => format!("{} {}", format_decimal(rsi, 2), pass_icon(self.rsi_pass)),
            None => "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioField {
    pub ratio: Ratio,
    pub value: Option<f64>,
    /// `None` when the value is absent.
    pub within_threshold: Option<bool>,
    pub display: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalReport {
    pub passed: bool,
    /// Empty when the fundamentals lookup itself failed.
    pub fields: Vec<RatioField>,
}

impl FundamentalReport {
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn field(&self, ratio: Ratio) -> Option<&RatioField> {
        self.fields.iter().find(|f| f.ratio == ratio)
    }
}

/// One row of the scorecard. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerResult {
    pub ticker: String,
    pub technical_pass: bool,
    pub fundamental_pass: bool,
    pub technical: TechnicalReport,
    pub fundamentals: FundamentalReport,
}

impl TickerResult {
    pub fn new(ticker: impl Into<String>, technical: TechnicalReport, fundamentals: FundamentalReport) -> Self {
        Self {
            ticker: ticker.into(),
            technical_pass: technical.passed(),
            fundamental_pass: fundamentals.passed,
            technical,
            fundamentals,
        }
    }
}
