// Exponential Moving Average (EMA) over a plain value series

/// EMA seeded with the simple average of the first `period` values.
pub fn ema_values(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || values.len() < period {
        return vec![None; values.len()];
    }

    let mut results = vec![None; period - 1];
    let multiplier = 2.0 / (period as f64 + 1.0);

    let initial_sum: f64 = values.iter().take(period).sum();
    let mut previous_ema = initial_sum / period as f64;
    results.push(Some(previous_ema));

    for value in values.iter().skip(period) {
        let ema = (value - previous_ema) * multiplier + previous_ema;
        results.push(Some(ema));
        previous_ema = ema;
    }
    results
}
