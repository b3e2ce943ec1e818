// Moving Average Convergence Divergence (MACD) indicator implementation
use super::{ema_values, IndicatorCalculator};
use serde_json::Value;
use shared::models::Bar;

pub struct Macd {
    name: String,
    fast: usize,
    slow: usize,
    signal: usize,
}

/// MACD line and its signal line, aligned with the input bars.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdLines {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self {
            name: format!("MACD({},{},{})", fast, slow, signal),
            fast,
            slow,
            signal,
        }
    }

    /// Bars needed before the signal line has its first value.
    pub fn warmup(&self) -> usize {
        self.slow.max(self.fast) + self.signal - 1
    }

    pub fn lines(&self, data: &[Bar]) -> MacdLines {
        let closes: Vec<f64> = data.iter().map(|b| b.close).collect();
        let fast = ema_values(&closes, self.fast);
        let slow = ema_values(&closes, self.slow);

        let macd: Vec<Option<f64>> = fast
            .iter()
            .zip(slow.iter())
            .map(|(f, s)| match (f, s) {
                (Some(f), Some(s)) => Some(f - s),
                _ => None,
            })
            .collect();

        // The signal EMA runs over the defined tail of the MACD line only.
        let first_defined = macd.iter().position(Option::is_some).unwrap_or(macd.len());
        let defined: Vec<f64> = macd[first_defined..].iter().flatten().copied().collect();
        let mut signal = vec![None; first_defined];
        signal.extend(ema_values(&defined, self.signal));

        MacdLines { macd, signal }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new(12, 26, 9)
    }
}

impl IndicatorCalculator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "fast": self.fast, "slow": self.slow, "signal": self.signal })
    }

    fn calculate(&self, data: &[Bar]) -> Vec<Option<f64>> {
        self.lines(data).macd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::bars_from_closes;

    #[test]
    fn test_macd_alignment() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let lines = Macd::default().lines(&bars_from_closes(&closes));

        assert_eq!(lines.macd.len(), 40);
        assert_eq!(lines.signal.len(), 40);
        assert!(lines.macd[..25].iter().all(Option::is_none));
        assert!(lines.macd[25].is_some());
        assert!(lines.signal[..33].iter().all(Option::is_none));
        assert!(lines.signal[33].is_some());
        assert_eq!(Macd::default().warmup(), 34);
    }

    #[test]
    fn test_macd_rising_series_is_positive() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let lines = Macd::default().lines(&bars_from_closes(&closes));
        let macd = lines.macd.last().copied().flatten().unwrap();
        assert!(macd > 0.0);
    }

    #[test]
    fn test_macd_short_series_is_undefined() {
        let lines = Macd::default().lines(&bars_from_closes(&[1.0; 20]));
        assert!(lines.macd.iter().all(Option::is_none));
        assert!(lines.signal.iter().all(Option::is_none));
    }

    #[test]
    fn test_macd_flat_series_is_zero() {
        let lines = Macd::default().lines(&bars_from_closes(&[50.0; 40]));
        assert_eq!(lines.macd[39], Some(0.0));
        assert_eq!(lines.signal[39], Some(0.0));
    }
}
