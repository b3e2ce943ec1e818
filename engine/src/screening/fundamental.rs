// Fundamental verdict from P/E, P/B, ROE and D/E
use shared::models::{FundamentalReport, FundamentalSnapshot, Ratio, RatioField, Thresholds};
use shared::utils::annotate;

use crate::error::EngineError;

pub struct FundamentalEvaluator {
    thresholds: Thresholds,
}

impl FundamentalEvaluator {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Passes only when P/E, P/B and ROE are all present and within limits.
    /// D/E is annotated but never required.
    pub fn evaluate(&self, snapshot: &FundamentalSnapshot) -> FundamentalReport {
        let fields: Vec<RatioField> = Ratio::ALL
            .iter()
            .map(|&ratio| self.field(ratio, snapshot.get(ratio)))
            .collect();

        let passed = fields
            .iter()
            .filter(|f| f.ratio.is_required())
            .all(|f| f.within_threshold == Some(true));

        FundamentalReport { passed, fields }
    }

    /// A failed lookup yields a failing verdict with no fields.
    pub fn evaluate_fetch(&self, ticker: &str, fetched: Result<FundamentalSnapshot, EngineError>) -> FundamentalReport {
        match fetched {
            Ok(snapshot) => self.evaluate(&snapshot),
            Err(e) => {
                tracing::debug!(ticker = %ticker, error = %e, "Fundamentals unavailable, marking as not passed");
                FundamentalReport::unavailable()
            }
        }
    }

    fn field(&self, ratio: Ratio, value: Option<f64>) -> RatioField {
        let within_threshold = value.map(|v| ratio.within(v, &self.thresholds));
        RatioField {
            ratio,
            value,
            within_threshold,
            display: annotate(value.map(|v| ratio.format_value(v)), within_threshold.unwrap_or(false)),
        }
    }
}
