// Text rendering of the scorecard and a console presentation sink
use shared::models::{Ratio, Thresholds, TickerResult};
use shared::utils::{format_decimal, format_percent, format_threshold, pass_icon};
use std::io::Write;

use crate::indicators::IndicatorCalculator;
use crate::screening::{IndicatorEngine, PresentationSink, ProgressUpdate};

/// Column headers, in display order.
pub fn headers(thresholds: &Thresholds) -> Vec<String> {
    let mut headers = vec![
        "Ticker".to_string(),
        "✔ Technical".to_string(),
        "✔ Fundamental".to_string(),
        "Price".to_string(),
        format!("RSI (<{})", format_threshold(thresholds.rsi_max)),
        "MACD > Signal?".to_string(),
        "Price > SMA50?".to_string(),
        "Volume > Avg20? (bonus)".to_string(),
    ];
    headers.extend(Ratio::ALL.iter().map(|r| r.column_label(thresholds)));
    headers
}

/// One row of cells matching `headers`. Ratio cells are blank when the lookup failed.
pub fn row(result: &TickerResult) -> Vec<String> {
    let technical = &result.technical;
    let mut cells = vec![
        result.ticker.clone(),
        pass_icon(result.technical_pass).to_string(),
        pass_icon(result.fundamental_pass).to_string(),
        format_decimal(technical.snapshot.price, 2),
        technical.rsi_display(),
        pass_icon(technical.macd_above_signal).to_string(),
        pass_icon(technical.price_above_sma50).to_string(),
        pass_icon(technical.volume_above_avg20).to_string(),
    ];
    cells.extend(Ratio::ALL.iter().map(|&ratio| {
        result
            .fundamentals
            .field(ratio)
            .map(|f| f.display.clone())
            .unwrap_or_default()
    }));
    cells
}

pub fn render_table(results: &[TickerResult], thresholds: &Thresholds) -> String {
    let headers = headers(thresholds);
    let rows: Vec<Vec<String>> = results.iter().map(row).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render_line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| {
                let pad = width.saturating_sub(cell.chars().count());
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&render_line(&headers));
    out.push('\n');
    out.push_str(&widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-"));
    out.push('\n');
    for cells in &rows {
        out.push_str(&render_line(cells));
        out.push('\n');
    }
    out
}

/// Reading guide for each indicator band, with the active pass thresholds.
pub fn criteria_legend(engine: &IndicatorEngine, thresholds: &Thresholds) -> String {
    let [rsi, macd, sma, volume] = engine.calculators().map(|c| c.name().to_string());
    let pe = format_threshold(thresholds.pe_max);
    let pb = format_threshold(thresholds.pb_max);
    let roe = format_percent(thresholds.roe_min, 0);
    let de = format_threshold(thresholds.de_max);

    let sections = [
        format!(
            "{rsi}: speed and change of price moves.\n  \
             🟢 < 30 oversold, buy signal\n  🟡 30-70 neutral\n  🔴 > 70 overbought, correction risk\n  \
             pass: below {}",
            format_threshold(thresholds.rsi_max)
        ),
        format!(
            "{macd}: gap between two exponential averages, flags trend changes.\n  \
             🟢 MACD > signal: positive trend, possible entry\n  🔴 MACD < signal: negative or flat trend\n  \
             pass: MACD above signal"
        ),
        format!(
            "{sma}: average close over 50 days, the overall trend.\n  \
             🟢 price > SMA50: uptrend\n  🔴 price < SMA50: downtrend\n  \
             pass: price above SMA50"
        ),
        format!(
            "{volume}: today's volume against its 20-day average, investor interest.\n  \
             🟢 volume > avg20: rising interest\n  🔴 volume < avg20: weak interest\n  \
             informational only"
        ),
        format!(
            "P/E: price paid per unit of earnings.\n  \
             🟢 < 15 very attractive\n  🟡 15-30 reasonable\n  🔴 > 30 potentially expensive\n  \
             pass: below {pe}"
        ),
        format!(
            "P/B: price against book value.\n  \
             🟢 < 1.5 may be undervalued\n  🟡 1.5-3 around average\n  🔴 > 3 potentially overvalued\n  \
             pass: below {pb}"
        ),
        format!(
            "ROE: return on shareholders' equity.\n  \
             🟢 > 15% very profitable\n  🟡 10-15% good\n  🔴 < 10% weak\n  \
             pass: above {roe}"
        ),
        format!(
            "D/E: reliance on debt.\n  \
             🟢 < 1 debt well controlled\n  🟡 1-2 moderate leverage\n  🔴 > 2 high financial risk\n  \
             informational only, shown against {de}"
        ),
    ];
    sections.join("\n\n")
}

/// Prints progress, warnings and the final table to a writer (stdout in the binary).
pub struct ConsoleSink<W: Write> {
    out: W,
    thresholds: Thresholds,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, thresholds: Thresholds) -> Self {
        Self { out, thresholds }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            tracing::warn!(error = %e, "Failed to write to console");
        }
    }

    pub fn print_results(&mut self, results: &[TickerResult]) {
        if results.is_empty() {
            self.emit("No results.");
        } else {
            let table = render_table(results, &self.thresholds);
            self.emit(table.trim_end());
        }
    }
}

impl<W: Write> PresentationSink for ConsoleSink<W> {
    fn on_ticker_started(&mut self, ticker: &str) {
        self.emit(&format!("🔍 Analyzing {}...", ticker));
    }

    fn on_progress(&mut self, update: &ProgressUpdate) {
        self.emit(&format!(
            "[{}/{}] {:>5.1}% {}",
            update.cursor,
            update.total,
            update.fraction() * 100.0,
            update.ticker
        ));
    }

    fn on_warning(&mut self, ticker: &str, message: &str) {
        self.emit(&format!("⚠️  Error processing {}: {}", ticker, message));
    }

    fn on_interrupted(&mut self, cursor: usize, total: usize) {
        self.emit(&format!(
            "🛑 Analysis interrupted at {}/{}. It can be resumed at any time.",
            cursor, total
        ));
    }

    fn on_completed(&mut self, results: &[TickerResult]) {
        self.emit("✅ Analysis complete!");
        self.print_results(results);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::fundamental::FundamentalEvaluator;
    use crate::screening::technical::judge;
    use shared::models::{FundamentalReport, FundamentalSnapshot, IndicatorSnapshot};

    fn result(ticker: &str, fundamentals: FundamentalReport) -> TickerResult {
        let snapshot = IndicatorSnapshot {
            price: 100.0,
            volume: 1_500.0,
            rsi: Some(40.0),
            macd: Some(1.2),
            macd_signal: Some(1.0),
            sma50: Some(95.0),
            volume_avg20: Some(1_000.0),
        };
        TickerResult::new(ticker, judge(snapshot, &Thresholds::default()), fundamentals)
    }

    #[test]
    fn test_headers_follow_thresholds() {
        let headers = headers(&Thresholds::default());
        assert_eq!(headers.len(), 12);
        assert_eq!(headers[4], "RSI (<55)");
        assert_eq!(headers[11], "D/E (<4) (optional)");
    }

    #[test]
    fn test_row_cells() {
        let evaluator = FundamentalEvaluator::new(Thresholds::default());
        let snapshot = FundamentalSnapshot {
            pe: Some(20.0),
            pb: Some(2.0),
            roe: Some(0.12),
            de: None,
        };
        let cells = row(&result("ASML.AS", evaluator.evaluate(&snapshot)));

        assert_eq!(cells[0], "ASML.AS");
        assert_eq!(cells[1], "✅");
        assert_eq!(cells[2], "✅");
        assert_eq!(cells[3], "100.00");
        assert_eq!(cells[4], "40.00 ✅");
        assert_eq!(cells[8], "20.00 ✅");
        assert_eq!(cells[10], "12.0% ✅");
        assert_eq!(cells[11], "N/A");
    }

    #[test]
    fn test_failed_lookup_leaves_ratio_cells_blank() {
        let cells = row(&result("NVO", FundamentalReport::unavailable()));
        assert_eq!(cells[2], "❌");
        assert!(cells[8..].iter().all(String::is_empty));
    }

    #[test]
    fn test_render_table() {
        let table = render_table(&[result("NVO", FundamentalReport::unavailable())], &Thresholds::default());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Ticker"));
        assert!(lines[2].starts_with("NVO"));
    }

    #[test]
    fn test_criteria_legend_uses_thresholds() {
        let thresholds = Thresholds {
            pe_max: 25.0,
            ..Thresholds::default()
        };
        let legend = criteria_legend(&IndicatorEngine::new(thresholds), &thresholds);

        assert!(legend.starts_with("RSI(14):"));
        assert!(legend.contains("MACD(12,26,9):"));
        assert!(legend.contains("VolumeSMA(20):"));
        assert!(legend.contains("pass: below 55"));
        assert!(legend.contains("pass: below 25"));
        assert!(legend.contains("pass: above 10%"));
        assert_eq!(legend.split("\n\n").count(), 8);
    }

    #[test]
    fn test_console_sink_output() {
        let mut sink = ConsoleSink::new(Vec::new(), Thresholds::default());
        sink.on_ticker_started("SAP.DE");
        sink.on_progress(&ProgressUpdate {
            ticker: "SAP.DE".to_string(),
            cursor: 1,
            total: 4,
        });
        sink.on_warning("BMW.DE", "timeout");
        sink.on_interrupted(2, 4);

        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("Analyzing SAP.DE"));
        assert!(output.contains("[1/4]  25.0% SAP.DE"));
        assert!(output.contains("Error processing BMW.DE: timeout"));
        assert!(output.contains("interrupted at 2/4"));
    }
}
