// Formatting helpers shared by the engine and any presentation layer.

pub const PASS_ICON: &str = "✅";
pub const FAIL_ICON: &str = "❌";
pub const NOT_AVAILABLE: &str = "N/A";

pub fn pass_icon(passed: bool) -> &'static str {
    if passed {
        PASS_ICON
    } else {
        FAIL_ICON
    }
}

pub fn format_decimal(value: f64, decimals: usize) -> String {
    format!("{:.decimals$}", value, decimals = decimals)
}

/// Renders a fraction as a percentage, e.g. `0.123` -> `"12.3%"`.
pub fn format_percent(fraction: f64, decimals: usize) -> String {
    format!("{:.decimals$}%", fraction * 100.0, decimals = decimals)
}

/// Renders a threshold without trailing zeros, e.g. `30.0` -> `"30"`, `2.5` -> `"2.5"`.
pub fn format_threshold(value: f64) -> String {
    let formatted = format!("{:.4}", value);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// `"{value} ✅"` / `"{value} ❌"`, or `"N/A"` when the value is missing.
pub fn annotate(value: Option<String>, passed: bool) -> String {
    match value {
        Some(v) => format!("{} {}", v, pass_icon(passed)),
        None => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(20.0, 2), "20.00");
        assert_eq!(format_decimal(1.23456, 2), "1.23");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.12, 1), "12.0%");
        assert_eq!(format_percent(0.10, 0), "10%");
    }

    #[test]
    fn test_format_threshold() {
        assert_eq!(format_threshold(30.0), "30");
        assert_eq!(format_threshold(2.5), "2.5");
        assert_eq!(format_threshold(55.0), "55");
    }

    #[test]
    fn test_annotate() {
        assert_eq!(annotate(Some("20.00".to_string()), true), "20.00 ✅");
        assert_eq!(annotate(Some("40.00".to_string()), false), "40.00 ❌");
        assert_eq!(annotate(None, true), "N/A");
    }
}
