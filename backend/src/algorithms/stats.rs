//! Descriptive statistics over duration samples.

use crate::api::SummaryStats;

/// Linear-interpolated percentile of an ascending, non-empty slice.
fn percentile(sorted: &[f64], fraction: f64) -> f64 {
    let rank = fraction.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Compute summary statistics for a set of values.
///
/// Non-finite values are ignored. Returns `None` when nothing remains, so an
/// empty cohort is never reported with a mean of zero.
pub fn compute_summary(values: &[f64]) -> Option<SummaryStats> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let count = sorted.len();
    let sum: f64 = sorted.iter().sum();
    let mean = sum / count as f64;

    let median = if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    };

    let variance = sorted
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / count as f64;

    Some(SummaryStats {
        count,
        mean,
        median,
        std_dev: variance.sqrt(),
        min: sorted[0],
        max: sorted[count - 1],
        sum,
        p10: percentile(&sorted, 0.10),
        p90: percentile(&sorted, 0.90),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_summary() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let stats = compute_summary(&values).unwrap();

        assert_eq!(stats.count, 5);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.sum, 15.0);
        assert!((stats.std_dev - std::f64::consts::SQRT_2).abs() < 0.001);
        assert!((stats.p10 - 1.4).abs() < 1e-9);
        assert!((stats.p90 - 4.6).abs() < 1e-9);
    }

    #[test]
    fn test_compute_summary_empty() {
        assert!(compute_summary(&[]).is_none());
        assert!(compute_summary(&[f64::NAN, f64::INFINITY]).is_none());
    }

    #[test]
    fn test_compute_summary_even_median() {
        let stats = compute_summary(&[8.0, 2.0, 6.0, 4.0]).unwrap();
        assert_eq!(stats.median, 5.0);
        assert_eq!(stats.min, 2.0);
    }

    #[test]
    fn test_compute_summary_single_value() {
        let stats = compute_summary(&[7.0]).unwrap();
        assert_eq!(stats.p10, 7.0);
        assert_eq!(stats.p90, 7.0);
        assert_eq!(stats.std_dev, 0.0);
    }
}
