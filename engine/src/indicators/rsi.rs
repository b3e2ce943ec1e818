// Relative Strength Index (RSI) indicator implementation
use super::IndicatorCalculator;
use serde_json::Value;
use shared::models::Bar;

pub struct Rsi {
    name: String,
    period: usize,
}

impl Rsi {
    pub const STANDARD_PERIOD: usize = 14;

    pub fn new(period: usize) -> Self {
        Self {
            name: format!("RSI({})", period),
            period,
        }
    }

    fn index(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            // No losses in the window
            100.0
        } else {
            let rs = avg_gain / avg_loss;
            100.0 - (100.0 / (1.0 + rs))
        }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(Self::STANDARD_PERIOD)
    }
}

impl IndicatorCalculator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    /// Wilder smoothing, seeded with the plain average of the first `period` changes.
    fn calculate(&self, data: &[Bar]) -> Vec<Option<f64>> {
        if self.period == 0 || data.len() <= self.period {
            return vec![None; data.len()];
        }

        let mut results = vec![None; self.period];
        let period = self.period as f64;

        let mut gains = 0.0;
        let mut losses = 0.0;
        for i in 1..=self.period {
            let change = data[i].close - data[i - 1].close;
            if change > 0.0 {
                gains += change;
            } else {
                losses -= change;
            }
        }

        let mut avg_gain = gains / period;
        let mut avg_loss = losses / period;
        results.push(Some(Self::index(avg_gain, avg_loss)));

        for i in (self.period + 1)..data.len() {
            let change = data[i].close - data[i - 1].close;
            let (gain, loss) = if change > 0.0 { (change, 0.0) } else { (0.0, -change) };

            avg_gain = (avg_gain * (period - 1.0) + gain) / period;
            avg_loss = (avg_loss * (period - 1.0) + loss) / period;
            results.push(Some(Self::index(avg_gain, avg_loss)));
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::bars_from_closes;

    #[test]
    fn test_rsi_reference_series() {
        // StockCharts' worked example
        let closes = [
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64, 46.25,
        ];
        let results = Rsi::default().calculate(&bars_from_closes(&closes));

        assert_eq!(results.len(), closes.len());
        assert!(results[..14].iter().all(Option::is_none));
        let first = results[14].unwrap();
        assert!((first - 70.46).abs() < 0.1, "RSI[14] = {}", first);
        assert!(results[14..].iter().all(|v| matches!(v, Some(x) if (0.0..=100.0).contains(x))));
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let bars = bars_from_closes(&[1.0; 14]);
        assert_eq!(Rsi::default().calculate(&bars), vec![None; 14]);
    }

    #[test]
    fn test_rsi_all_gains() {
        let closes: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let results = Rsi::default().calculate(&bars_from_closes(&closes));
        for value in &results[14..] {
            assert_eq!(*value, Some(100.0));
        }
    }

    #[test]
    fn test_rsi_all_losses() {
        let closes: Vec<f64> = (1..=20).map(|i| 20.0 - i as f64).collect();
        let results = Rsi::default().calculate(&bars_from_closes(&closes));
        for value in &results[14..] {
            assert_eq!(*value, Some(0.0));
        }
    }
}
