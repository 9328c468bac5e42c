/// Compute X (session count) and Y (WPM) bounds for the history chart
pub fn compute_chart_params(points: &[(f64, f64)]) -> (f64, f64) {
    let mut highest_wpm = 0.0;
    for &(_, wpm) in points {
        if wpm > highest_wpm {
            highest_wpm = wpm;
        }
    }

    let mut overall_sessions = match points.last() {
        Some(p) => p.0,
        None => 1.0,
    };
    if overall_sessions < 1.0 {
        overall_sessions = 1.0;
    }

    (overall_sessions, highest_wpm.round())
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
