use crate::{results::WpmPoint, session::TestMode};

/// Compute X (seconds) and Y (WPM) bounds for the results chart.
/// Time mode spans the configured duration, other modes the time actually taken.
pub fn compute_chart_params(series: &[WpmPoint], configured_secs: Option<f64>) -> (f64, f64) {
    let highest_wpm = series.iter().map(|p| p.wpm).fold(0.0, f64::max);

    let overall_duration = match (configured_secs, series.last()) {
        (Some(secs), _) => secs,
        (None, Some(p)) => p.t,
        (None, None) => 1.0,
    }
    .max(1.0);

    // headroom above the best sample, rounded to a multiple of ten
    let y_max = ((highest_wpm * 1.1) / 10.0).ceil().max(1.0) * 10.0;

    (overall_duration, y_max)
}

/// X axis labels: seconds in time mode, progress percentages otherwise
pub fn chart_labels(mode: TestMode, duration_secs: usize) -> Vec<String> {
    match mode {
        TestMode::Time => (0..=5)
            .map(|i| format!("{}s", duration_secs * i / 5))
            .collect(),
        TestMode::Words | TestMode::Quote => ["Start", "20%", "40%", "60%", "80%", "End"]
            .into_iter()
            .map(String::from)
            .collect(),
    }
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
