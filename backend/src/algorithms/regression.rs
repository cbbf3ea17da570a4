//! Ordinary-least-squares regression of duration against a physical measure.
//!
//! The confidence band uses a fixed two-tailed 95% t-table rather than a
//! distribution function, so band widths are reproducible bit for bit.

use crate::api::{ConfidencePoint, RegressionResult};

/// Two-tailed 95% critical values of Student's t for 1 through 30 degrees of freedom.
pub const T_CRITICAL_95: [f64; 30] = [
    12.706, 4.303, 3.182, 2.776, 2.571, 2.447, 2.365, 2.306, 2.262, 2.228, // 1-10
    2.201, 2.179, 2.160, 2.145, 2.131, 2.120, 2.110, 2.101, 2.093, 2.086, // 11-20
    2.080, 2.074, 2.069, 2.064, 2.060, 2.056, 2.052, 2.048, 2.045, 2.042, // 21-30
];

/// Fewest and most points sampled along the confidence band.
pub const MIN_BAND_POINTS: usize = 24;
pub const MAX_BAND_POINTS: usize = 60;

/// Two-tailed 95% critical value for `df` degrees of freedom.
///
/// Table lookup up to 30, then 2.0 up to 60, 1.98 up to 120 and 1.96 beyond.
pub fn t_critical_95(df: usize) -> Option<f64> {
    match df {
        0 => None,
        1..=30 => Some(T_CRITICAL_95[df - 1]),
        31..=60 => Some(2.0),
        61..=120 => Some(1.98),
        _ => Some(1.96),
    }
}

/// Number of band samples for `n` observations.
pub fn band_point_count(n: usize) -> usize {
    n.saturating_mul(2).clamp(MIN_BAND_POINTS, MAX_BAND_POINTS)
}

fn is_valid(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Fit `y = intercept + slope * x` over the strictly positive, finite samples.
///
/// Returns `None` for fewer than two usable samples or when every x is identical.
pub fn fit_regression(samples: &[(f64, f64)]) -> Option<RegressionResult> {
    let points: Vec<(f64, f64)> = samples
        .iter()
        .copied()
        .filter(|(x, y)| is_valid(*x) && is_valid(*y))
        .collect();

    let n = points.len();
    if n < 2 {
        return None;
    }

    let min_x = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let max_x = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    if min_x == max_x {
        return None;
    }

    let nf = n as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / nf;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / nf;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for (x, y) in &points {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    if sxx <= 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let predict = |x: f64| intercept + slope * x;

    let residuals: Vec<f64> = points.iter().map(|(x, y)| y - predict(*x)).collect();
    let sse: f64 = residuals.iter().map(|r| r * r).sum();
    let mae = residuals.iter().map(|r| r.abs()).sum::<f64>() / nf;
    let rmse = (sse / nf).sqrt();

    let correlation = if syy > 0.0 {
        Some(sxy / (sxx * syy).sqrt())
    } else {
        None
    };
    let r_squared = if syy > 0.0 {
        Some(1.0 - sse / syy)
    } else {
        None
    };
    let adjusted_r_squared = if n > 2 {
        r_squared.map(|r2| 1.0 - (1.0 - r2) * (nf - 1.0) / (nf - 2.0))
    } else {
        None
    };

    let mut result = RegressionResult {
        slope,
        intercept,
        correlation,
        r_squared,
        adjusted_r_squared,
        rmse,
        mae,
        mean_x,
        mean_y,
        min_x,
        max_x,
        predicted_at_min_x: predict(min_x),
        predicted_at_max_x: predict(max_x),
        sample_count: n,
        residual_std_error: None,
        t_critical: None,
        confidence_band: None,
    };

    if n > 2 {
        let residual_std_error = (sse / (nf - 2.0)).sqrt();
        if let Some(t) = t_critical_95(n - 2) {
            let points = band_point_count(n);
            let step = (max_x - min_x) / (points - 1) as f64;
            let band = (0..points)
                .map(|k| {
                    let x = if k == points - 1 {
                        max_x
                    } else {
                        min_x + step * k as f64
                    };
                    let predicted_y = predict(x);
                    let se = residual_std_error
                        * (1.0 / nf + (x - mean_x).powi(2) / sxx).sqrt();
                    let margin = t * se;
                    ConfidencePoint {
                        x,
                        predicted_y,
                        lower_y: predicted_y - margin,
                        upper_y: predicted_y + margin,
                    }
                })
                .collect();

            result.residual_std_error = Some(residual_std_error);
            result.t_critical = Some(t);
            result.confidence_band = Some(band);
        }
    }

    Some(result)
}
