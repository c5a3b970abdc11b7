pub fn mean(data: &[f64]) -> Option<f64> {
    let sum = data.iter().sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

pub fn std_dev(data: &[f64]) -> Option<f64> {
    match (mean(data), data.len()) {
        (Some(data_mean), count) if count > 0 => {
            let variance = data
                .iter()
                .map(|value| {
                    let diff = data_mean - *value;

                    diff * diff
                })
                .sum::<f64>()
                / count as f64;

            Some(variance.sqrt())
        }
        _ => None,
    }
}

/// Percentage of `part` in `whole`, rounded to a whole number.
/// An empty whole counts as a perfect score.
pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 100.0;
    }
    ((part as f64 / whole as f64) * 100.0).round()
}

/// How steady a series is, as 100 minus its coefficient of variation in percent.
/// Clamped to 0..=100. Series with fewer than two samples are perfectly steady.
pub fn steadiness(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 100.0;
    }
    match (mean(data), std_dev(data)) {
        (Some(m), Some(sd)) if m > 0.0 => ((1.0 - sd / m) * 100.0).clamp(0.0, 100.0).round(),
        _ => 0.0,
    }
}
