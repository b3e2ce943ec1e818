// Technical verdict for the most recent bar of a price series
use shared::models::{IndicatorSnapshot, PriceSeries, TechnicalReport, Thresholds};

use crate::indicators::{last_value, IndicatorCalculator, Macd, PriceField, Rsi, Sma};

pub const SMA_PERIOD: usize = 50;
pub const VOLUME_AVG_PERIOD: usize = 20;

/// Computes RSI(14), MACD(12,26,9), SMA50 and the 20-day volume average.
pub struct IndicatorEngine {
    rsi: Rsi,
    macd: Macd,
    sma: Sma,
    volume_avg: Sma,
    thresholds: Thresholds,
}

impl IndicatorEngine {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            rsi: Rsi::default(),
            macd: Macd::default(),
            sma: Sma::new(SMA_PERIOD),
            volume_avg: Sma::over(VOLUME_AVG_PERIOD, PriceField::Volume),
            thresholds,
        }
    }

    /// Bars needed before every indicator has a value.
    pub fn min_bars(&self) -> usize {
        SMA_PERIOD.max(VOLUME_AVG_PERIOD).max(self.macd.warmup())
    }

    pub fn calculators(&self) -> [&dyn IndicatorCalculator; 4] {
        [&self.rsi, &self.macd, &self.sma, &self.volume_avg]
    }

    /// Indicator values at the last bar, or `None` for an empty series.
    pub fn snapshot(&self, series: &PriceSeries) -> Option<IndicatorSnapshot> {
        let bars = series.bars();
        let last = series.last()?;

        if bars.len() < self.min_bars() {
            tracing::debug!(
                ticker = %series.ticker,
                bars = bars.len(),
                required = self.min_bars(),
                "Short price history, some indicators unavailable"
            );
        }

        let macd = self.macd.lines(bars);
        Some(IndicatorSnapshot {
            price: last.close,
            volume: last.volume,
            rsi: last_value(&self.rsi.calculate(bars)),
            macd: last_value(&macd.macd),
            macd_signal: last_value(&macd.signal),
            sma50: last_value(&self.sma.calculate(bars)),
            volume_avg20: last_value(&self.volume_avg.calculate(bars)),
        })
    }

    pub fn evaluate(&self, series: &PriceSeries) -> Option<TechnicalReport> {
        self.snapshot(series).map(|s| judge(s, &self.thresholds))
    }
}

/// Applies the thresholds to a snapshot. A missing indicator fails its clause.
pub fn judge(snapshot: IndicatorSnapshot, thresholds: &Thresholds) -> TechnicalReport {
    let rsi_pass = snapshot.rsi.is_some_and(|rsi| rsi < thresholds.rsi_max);
    let macd_above_signal = match (snapshot.macd, snapshot.macd_signal) {
        (Some(macd), Some(signal)) => macd > signal,
        _ => false,
    };
    let price_above_sma50 = snapshot.sma50.is_some_and(|sma| snapshot.price > sma);
    let volume_above_avg20 = snapshot.volume_avg20.is_some_and(|avg| snapshot.volume > avg);

    TechnicalReport {
        snapshot,
        rsi_pass,
        macd_above_signal,
        price_above_sma50,
        volume_above_avg20,
    }
}
