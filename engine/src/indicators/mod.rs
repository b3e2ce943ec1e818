// Technical indicators over daily bars
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::ema_values;
pub use macd::{Macd, MacdLines};
pub use rsi::Rsi;
pub use sma::{sma_values, Sma};

use serde_json::Value;
use shared::models::Bar;

// Common trait for all indicators
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value;
    /// One entry per bar; `None` until the indicator's window is filled.
    fn calculate(&self, data: &[Bar]) -> Vec<Option<f64>>;
}

/// Which bar field an indicator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    Close,
    Volume,
}

impl PriceField {
    pub fn extract(&self, data: &[Bar]) -> Vec<f64> {
        data.iter()
            .map(|b| match self {
                PriceField::Close => b.close,
                PriceField::Volume => b.volume,
            })
            .collect()
    }

    fn label(&self) -> &'static str {
        match self {
            PriceField::Close => "close",
            PriceField::Volume => "volume",
        }
    }
}

/// Latest value of an indicator series, if defined.
pub fn last_value(values: &[Option<f64>]) -> Option<f64> {
    values.last().copied().flatten().filter(|v| v.is_finite())
}
