// Simple Moving Average (SMA) indicator implementation
use super::{IndicatorCalculator, PriceField};
use serde_json::Value;
use shared::models::Bar;

pub struct Sma {
    name: String,
    period: usize,
    field: PriceField,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self::over(period, PriceField::Close)
    }

    pub fn over(period: usize, field: PriceField) -> Self {
        let name = match field {
            PriceField::Close => format!("SMA({})", period),
            PriceField::Volume => format!("VolumeSMA({})", period),
        };
        Self {
            name,
            period,
            field,
        }
    }
}

impl IndicatorCalculator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period, "field": self.field.label() })
    }

    fn calculate(&self, data: &[Bar]) -> Vec<Option<f64>> {
        sma_values(&self.field.extract(data), self.period)
    }
}

/// Rolling mean over `period` values; `None` until the first window is full.
pub fn sma_values(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || values.len() < period {
        return vec![None; values.len()];
    }

    let mut results = vec![None; period - 1];

    let mut sum: f64 = values.iter().take(period).sum();
    results.push(Some(sum / period as f64));

    // Slide the window
    for i in period..values.len() {
        sum = sum - values[i - period] + values[i];
        results.push(Some(sum / period as f64));
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::bars_from_closes;

    fn assert_close(a: &[Option<f64>], b: &[Option<f64>]) {
        assert_eq!(a.len(), b.len(), "Vectors differ in length");
        for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
            match (x, y) {
                (Some(x), Some(y)) => assert!((x - y).abs() < 1e-9, "Mismatch at index {}: {} != {}", i, x, y),
                (None, None) => {}
                _ => panic!("Mismatch at index {}: {:?} != {:?}", i, x, y),
            }
        }
    }

    #[test]
    fn test_sma_calculation() {
        let bars = bars_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let results = Sma::new(3).calculate(&bars);
        assert_close(&results, &[None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_sma_insufficient_data() {
        let bars = bars_from_closes(&[1.0, 2.0]);
        assert_eq!(Sma::new(3).calculate(&bars), vec![None, None]);
    }

    #[test]
    fn test_sma_period_one() {
        let bars = bars_from_closes(&[1.0, 2.0, 3.0]);
        assert_close(&Sma::new(1).calculate(&bars), &[Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_sma_period_zero_is_undefined() {
        let bars = bars_from_closes(&[1.0, 2.0, 3.0]);
        assert_eq!(Sma::new(0).calculate(&bars), vec![None; 3]);
    }

    #[test]
    fn test_sma_empty_data() {
        assert!(Sma::new(3).calculate(&[]).is_empty());
    }

    #[test]
    fn test_volume_sma() {
        // volumes are 1000, 1001, 1002, 1003
        let bars = bars_from_closes(&[1.0, 1.0, 1.0, 1.0]);
        let sma = Sma::over(2, PriceField::Volume);
        assert_eq!(sma.name(), "VolumeSMA(2)");
        assert_eq!(sma.parameters(), serde_json::json!({ "period": 2, "field": "volume" }));
        assert_close(&sma.calculate(&bars), &[None, Some(1000.5), Some(1001.5), Some(1002.5)]);
    }
}
