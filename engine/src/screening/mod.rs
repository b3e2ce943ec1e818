// Screening: technical and fundamental verdicts plus the batch controller
pub mod controller;
pub mod fundamental;
pub mod sink;
pub mod technical;

pub use controller::{RunHandle, RunState, ScreeningController, ScreeningRun, StepOutcome, TickerWarning};
pub use fundamental::FundamentalEvaluator;
pub use sink::{PresentationSink, ProgressUpdate};
pub use technical::IndicatorEngine;
