// Resumable batch screening over a ticker universe
use shared::models::{Interval, Lookback, TickerResult};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::fundamental::FundamentalEvaluator;
use super::sink::{PresentationSink, ProgressUpdate};
use super::technical::IndicatorEngine;
use crate::config::ScreenerSettings;
use crate::data::{MarketDataSource, TickerUniverseSource, Universe};
use crate::indicators::IndicatorCalculator;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Paused,
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickerWarning {
    pub ticker: String,
    pub message: String,
}

/// What a single `step` did.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// A row was appended.
    Scored(TickerResult),
    /// No usable price data; nothing appended.
    Skipped { ticker: String },
    /// Fetching or scoring failed; nothing appended.
    Warning(TickerWarning),
    /// A pause was requested before the ticker was touched.
    Interrupted,
    Completed,
    /// No run has been started.
    Idle,
}

impl StepOutcome {
    /// The ticker this step processed, if any.
    pub fn ticker(&self) -> Option<&str> {
        match self {
            StepOutcome::Scored(result) => Some(&result.ticker),
            StepOutcome::Skipped { ticker } => Some(ticker),
            StepOutcome::Warning(warning) => Some(&warning.ticker),
            StepOutcome::Interrupted | StepOutcome::Completed | StepOutcome::Idle => None,
        }
    }
}

/// Session state of one screening run.
///
/// `cursor` counts the tickers fully processed (scored, skipped or failed),
/// so `results` up to that point are final and safe to read at any time.
pub struct ScreeningRun {
    pub id: Uuid,
    pub universe: Universe,
    tickers: Vec<String>,
    results: Vec<TickerResult>,
    warnings: Vec<TickerWarning>,
    cursor: Arc<AtomicUsize>,
    running: Arc<AtomicBool>,
}

impl ScreeningRun {
    fn new(universe: Universe, tickers: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            universe,
            running: Arc::new(AtomicBool::new(!tickers.is_empty())),
            tickers,
            results: Vec::new(),
            warnings: Vec::new(),
            cursor: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn results(&self) -> &[TickerResult] {
        &self.results
    }

    pub fn warnings(&self) -> &[TickerWarning] {
        &self.warnings
    }

    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    pub fn state(&self) -> RunState {
        if self.cursor() >= self.tickers.len() {
            RunState::Completed
        } else if self.running.load(Ordering::Acquire) {
            RunState::Running
        } else {
            RunState::Paused
        }
    }

    pub fn progress(&self) -> f64 {
        if self.tickers.is_empty() {
            1.0
        } else {
            self.cursor() as f64 / self.tickers.len() as f64
        }
    }

    fn advance(&self) -> usize {
        let cursor = self.cursor.fetch_add(1, Ordering::AcqRel) + 1;
        if cursor >= self.tickers.len() {
            self.running.store(false, Ordering::Release);
        }
        cursor
    }

    fn handle(&self) -> RunHandle {
        RunHandle {
            run_id: self.id,
            running: Arc::clone(&self.running),
            cursor: Arc::clone(&self.cursor),
            total: self.tickers.len(),
        }
    }
}

/// Lock-free view of a run for other tasks. Pausing takes effect between tickers.
#[derive(Debug, Clone)]
pub struct RunHandle {
    run_id: Uuid,
    running: Arc<AtomicBool>,
    cursor: Arc<AtomicUsize>,
    total: usize,
}

impl RunHandle {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn pause(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn processed(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

pub struct ScreeningController {
    universe_source: Arc<dyn TickerUniverseSource>,
    market: Arc<dyn MarketDataSource>,
    indicators: IndicatorEngine,
    fundamentals: FundamentalEvaluator,
    lookback: Lookback,
    pacing_delay: Duration,
    run: Option<ScreeningRun>,
}

impl ScreeningController {
    pub fn new(
        universe_source: Arc<dyn TickerUniverseSource>,
        market: Arc<dyn MarketDataSource>,
        settings: &ScreenerSettings,
    ) -> Self {
        Self {
            universe_source,
            market,
            indicators: IndicatorEngine::new(settings.thresholds),
            fundamentals: FundamentalEvaluator::new(settings.thresholds),
            lookback: settings.lookback(),
            pacing_delay: settings.pacing_delay(),
            run: None,
        }
    }

    /// Loads `universe` and replaces any previous run. On failure the previous run is left as it was.
    pub async fn start(&mut self, universe: Universe) -> Result<RunHandle> {
        let tickers = self.universe_source.list(universe).await.map_err(|e| {
            tracing::error!(%universe, error = %e, "Could not load ticker universe");
            e
        })?;

        let run = ScreeningRun::new(universe, tickers);
        tracing::info!(run_id = %run.id, %universe, tickers = run.tickers.len(), "Screening run started");
        for calculator in self.indicators.calculators() {
            tracing::debug!(
                run_id = %run.id,
                indicator = calculator.name(),
                parameters = %calculator.parameters(),
                "Indicator configured"
            );
        }
        let handle = run.handle();
        self.run = Some(run);
        Ok(handle)
    }

    pub fn pause(&mut self) -> RunState {
        if let Some(run) = &self.run {
            if run.state() == RunState::Running {
                run.running.store(false, Ordering::Release);
                tracing::info!(run_id = %run.id, cursor = run.cursor(), "Pause requested");
            }
        }
        self.state()
    }

    pub fn resume(&mut self) -> RunState {
        if let Some(run) = &self.run {
            if run.state() == RunState::Paused {
                run.running.store(true, Ordering::Release);
                tracing::info!(run_id = %run.id, cursor = run.cursor(), "Resuming run");
            }
        }
        self.state()
    }

    pub fn state(&self) -> RunState {
        self.run.as_ref().map_or(RunState::Idle, ScreeningRun::state)
    }

    pub fn current_run(&self) -> Option<&ScreeningRun> {
        self.run.as_ref()
    }

    pub fn current_results(&self) -> &[TickerResult] {
        self.run.as_ref().map(ScreeningRun::results).unwrap_or(&[])
    }

    pub fn progress(&self) -> f64 {
        self.run.as_ref().map_or(0.0, ScreeningRun::progress)
    }

    pub fn handle(&self) -> Option<RunHandle> {
        self.run.as_ref().map(ScreeningRun::handle)
    }

    /// Processes the ticker at the cursor, then advances the cursor by one.
    pub async fn step(&mut self) -> StepOutcome {
        self.step_with(None).await
    }

    async fn step_with(&mut self, sink: Option<&mut (dyn PresentationSink + '_)>) -> StepOutcome {
        let (ticker, run_id) = match &self.run {
            None => return StepOutcome::Idle,
            Some(run) => match run.state() {
                RunState::Completed => return StepOutcome::Completed,
                RunState::Paused | RunState::Idle => return StepOutcome::Interrupted,
                RunState::Running => (run.tickers[run.cursor()].clone(), run.id),
            },
        };
        if let Some(sink) = sink {
            sink.on_ticker_started(&ticker);
        }

        let screened = self.screen_ticker(&ticker).await;

        let Some(run) = self.run.as_mut() else {
            return StepOutcome::Idle;
        };
        let outcome = match screened {
            Ok(Some(result)) => {
                run.results.push(result.clone());
                StepOutcome::Scored(result)
            }
            Ok(None) => {
                tracing::debug!(%run_id, ticker = %ticker, "No usable price data, skipping");
                StepOutcome::Skipped { ticker }
            }
            Err(e) => {
                tracing::warn!(%run_id, ticker = %ticker, error = %e, "Failed to screen ticker");
                let warning = TickerWarning {
                    ticker,
                    message: e.to_string(),
                };
                run.warnings.push(warning.clone());
                StepOutcome::Warning(warning)
            }
        };
        run.advance();
        outcome
    }

    /// Steps until the run completes or a pause is observed between tickers.
    pub async fn run(&mut self, sink: &mut dyn PresentationSink) -> RunState {
        loop {
            let Some(run) = self.run.as_ref() else {
                return RunState::Idle;
            };
            match run.state() {
                RunState::Completed => {
                    tracing::info!(
                        run_id = %run.id,
                        results = run.results.len(),
                        warnings = run.warnings.len(),
                        "Screening run completed"
                    );
                    sink.on_completed(run.results());
                    return RunState::Completed;
                }
                RunState::Paused => {
                    tracing::info!(run_id = %run.id, cursor = run.cursor(), "Screening run interrupted");
                    sink.on_interrupted(run.cursor(), run.tickers.len());
                    return RunState::Paused;
                }
                RunState::Running | RunState::Idle => {}
            }

            let outcome = self.step_with(Some(&mut *sink)).await;
            if let StepOutcome::Warning(warning) = &outcome {
                sink.on_warning(&warning.ticker, &warning.message);
            }
            let Some(ticker) = outcome.ticker() else {
                continue;
            };

            let Some(run) = self.run.as_ref() else {
                return RunState::Idle;
            };
            sink.on_progress(&ProgressUpdate {
                ticker: ticker.to_string(),
                cursor: run.cursor(),
                total: run.tickers.len(),
            });

            if run.state() == RunState::Running && !self.pacing_delay.is_zero() {
                tokio::time::sleep(self.pacing_delay).await;
            }
        }
    }

    async fn screen_ticker(&self, ticker: &str) -> Result<Option<TickerResult>> {
        let series = match self
            .market
            .fetch_price_series(ticker, self.lookback, Interval::Day1)
            .await
        {
            Ok(series) => series.without_incomplete_bars(),
            Err(e) if e.is_data_unavailable() => return Ok(None),
            Err(e) => return Err(e),
        };

        let Some(technical) = self.indicators.evaluate(&series) else {
            return Ok(None);
        };

        let fetched = self.market.fetch_fundamentals(ticker).await;
        let fundamentals = self.fundamentals.evaluate_fetch(ticker, fetched);

        Ok(Some(TickerResult::new(ticker, technical, fundamentals)))
    }
}
