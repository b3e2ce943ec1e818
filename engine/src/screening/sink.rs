use shared::models::TickerResult;

/// Progress after a ticker has been processed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub ticker: String,
    pub cursor: usize,
    pub total: usize,
}

impl ProgressUpdate {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.cursor as f64 / self.total as f64
        }
    }
}

/// Passive receiver of screening events. Never feeds back into the controller.
pub trait PresentationSink {
    fn on_ticker_started(&mut self, _ticker: &str) {}

    fn on_progress(&mut self, update: &ProgressUpdate);

    fn on_warning(&mut self, ticker: &str, message: &str);

    fn on_interrupted(&mut self, _cursor: usize, _total: usize) {}

    fn on_completed(&mut self, results: &[TickerResult]);
}
