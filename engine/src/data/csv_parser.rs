use csv::{ReaderBuilder, StringRecord};
use shared::models::{Bar, Interval, PriceSeries};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{EngineError, Result};

// Number and date handling for Yahoo-style daily exports
pub mod yahoo_format {
    use anyhow::{anyhow, Result};
    use chrono::NaiveDate;

    /// Parses `2024-03-28`, ignoring any trailing time component.
    pub fn parse_date(s: &str) -> Result<NaiveDate> {
        let s = s.trim();
        let date_part = s.get(..10).unwrap_or(s);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map_err(|e| anyhow!("Failed to parse date '{}': {}", s, e))
    }

    /// Missing or unparseable numbers become NaN so the bar is later dropped.
    pub fn parse_number(s: &str) -> f64 {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("null") || s.eq_ignore_ascii_case("nan") {
            return f64::NAN;
        }
        s.replace(',', "").parse::<f64>().unwrap_or(f64::NAN)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::Datelike;

        #[test]
        fn test_parse_date() {
            let date = parse_date("2024-03-28").unwrap();
            assert_eq!((date.year(), date.month(), date.day()), (2024, 3, 28));
        }

        #[test]
        fn test_parse_date_with_time() {
            assert!(parse_date("2024-03-28 00:00:00-04:00").is_ok());
        }

        #[test]
        fn test_parse_date_invalid() {
            assert!(parse_date("28/03/2024").is_err());
            assert!(parse_date("2024-13-01").is_err());
        }

        #[test]
        fn test_parse_number() {
            assert_eq!(parse_number("171.48"), 171.48);
            assert_eq!(parse_number("1,234,567"), 1_234_567.0);
            assert!(parse_number("null").is_nan());
            assert!(parse_number("").is_nan());
            assert!(parse_number("abc").is_nan());
        }
    }
}

pub struct PriceCsvParser;

impl PriceCsvParser {
    // CSV Header: Date,Open,High,Low,Close,Adj Close,Volume  (Adj Close optional)
    // Example Row: 2024-03-28,171.75,172.23,170.51,171.48,170.86,65672700
    pub fn load_series_from_csv(file_path: &Path, ticker: &str) -> Result<PriceSeries> {
        let file = File::open(file_path)?;
        Self::parse_series(BufReader::new(file), ticker)
            .map_err(|e| match e {
                EngineError::CsvDataFormatError(msg) => {
                    EngineError::CsvDataFormatError(format!("{}: {}", file_path.display(), msg))
                }
                other => other,
            })
    }

    /// Parses bars from any reader. Rows with missing numbers are dropped.
    pub fn parse_series<R: Read>(reader: R, ticker: &str) -> Result<PriceSeries> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let columns = ["Date", "Open", "High", "Low", "Close", "Volume"];
        let mut positions = [0usize; 6];
        for (slot, name) in positions.iter_mut().zip(columns) {
            *slot = Self::column(&headers, name)
                .ok_or_else(|| EngineError::CsvDataFormatError(format!("Missing '{}' column", name)))?;
        }

        let mut bars = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let record = result?;
            let line = idx + 2;
            let field = |pos: usize| record.get(pos).unwrap_or("");

            let date = yahoo_format::parse_date(field(positions[0]))
                .map_err(|e| EngineError::CsvDataFormatError(format!("line {}: {}", line, e)))?;

            bars.push(Bar {
                date,
                open: yahoo_format::parse_number(field(positions[1])),
                high: yahoo_format::parse_number(field(positions[2])),
                low: yahoo_format::parse_number(field(positions[3])),
                close: yahoo_format::parse_number(field(positions[4])),
                volume: yahoo_format::parse_number(field(positions[5])),
            });
        }

        Ok(PriceSeries::new(ticker, Interval::Day1, bars).without_incomplete_bars())
    }

    /// Reads one column of symbols, e.g. the `Symbol` column of an index constituent list.
    pub fn load_symbols_from_csv(file_path: &Path, column: &str) -> Result<Vec<String>> {
        let file = File::open(file_path)?;
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file));

        let headers = rdr.headers()?.clone();
        let pos = Self::column(&headers, column)
            .ok_or_else(|| EngineError::CsvDataFormatError(format!("Missing '{}' column", column)))?;

        let mut symbols = Vec::new();
        for result in rdr.records() {
            let record = result?;
            if let Some(symbol) = record.get(pos).filter(|s| !s.is_empty()) {
                symbols.push(symbol.to_string());
            }
        }
        Ok(symbols)
    }

    fn column(headers: &StringRecord, name: &str) -> Option<usize> {
        headers.iter().position(|h| h.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_series_valid_data() {
        let csv_content = "\
Date,Open,High,Low,Close,Adj Close,Volume
2024-03-27,170.41,173.60,170.11,173.31,172.69,60273300
2024-03-28,171.75,172.23,170.51,171.48,170.86,65672700";
        let tmp_file = create_test_csv(csv_content);
        let series = PriceCsvParser::load_series_from_csv(tmp_file.path(), "AAPL").unwrap();

        assert_eq!(series.ticker, "AAPL");
        assert_eq!(series.len(), 2);
        let last = series.last().unwrap();
        assert_eq!(last.close, 171.48);
        assert_eq!(last.volume, 65_672_700.0);
    }

    #[test]
    fn test_rows_with_null_values_are_dropped() {
        let csv_content = "\
Date,Open,High,Low,Close,Volume
2024-03-27,170.41,173.60,170.11,173.31,60273300
2024-03-28,null,null,null,null,null
2024-03-29,171.75,172.23,170.51,171.48,65672700";
        let series = PriceCsvParser::parse_series(csv_content.as_bytes(), "AAPL").unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_header_only_gives_empty_series() {
        let tmp_file = create_test_csv("Date,Open,High,Low,Close,Volume");
        let series = PriceCsvParser::load_series_from_csv(tmp_file.path(), "EMPTY").unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_missing_column() {
        let csv_content = "Date,Open,High,Low,Close\n2024-03-27,1,1,1,1";
        let err = PriceCsvParser::parse_series(csv_content.as_bytes(), "X").unwrap_err();
        assert!(err.to_string().contains("Missing 'Volume' column"));
    }

    #[test]
    fn test_bad_date_is_format_error() {
        let csv_content = "Date,Open,High,Low,Close,Volume\n27/03/2024,1,1,1,1,1";
        let tmp_file = create_test_csv(csv_content);
        let err = PriceCsvParser::load_series_from_csv(tmp_file.path(), "X").unwrap_err();
        assert!(matches!(err, EngineError::CsvDataFormatError(_)));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PriceCsvParser::load_series_from_csv(Path::new("no/such/file.csv"), "X").unwrap_err();
        assert!(matches!(err, EngineError::IoError { .. }));
    }

    #[test]
    fn test_load_symbols() {
        let csv_content = "Symbol,Security\nMMM,3M\nAOS,A. O. Smith\n,blank\nABT,Abbott";
        let tmp_file = create_test_csv(csv_content);
        let symbols = PriceCsvParser::load_symbols_from_csv(tmp_file.path(), "Symbol").unwrap();
        assert_eq!(symbols, vec!["MMM", "AOS", "ABT"]);
    }
}
