//! Fixed-width histograms over raw and normalized durations.
//!
//! Bins are `[i * bin_size, (i + 1) * bin_size)` starting at zero and covering
//! the maximum observed value, so the layout depends only on the bin size and
//! that maximum. Each bin keeps its members for inspection.

use crate::api::{CompletionRecord, Histogram, HistogramBin, NormalizedRow, NumericParam};
use crate::error::ValidationError;

/// Bin size in minutes used when the requested one is not positive.
pub const DEFAULT_DURATION_BIN_SIZE: f64 = 5.0;

/// Bin size in minutes per unit used when the requested one is not positive.
pub const DEFAULT_NORMALIZED_BIN_SIZE: f64 = 0.5;

/// Upper bound on the number of bins; wider bins are used beyond it.
pub const MAX_BIN_COUNT: usize = 2000;

/// Check a user-supplied bin size, naming the fallback in the error.
pub fn validate_bin_size(requested: f64, fallback: f64) -> Result<f64, ValidationError> {
    if requested.is_finite() && requested > 0.0 {
        Ok(requested)
    } else {
        Err(ValidationError::NonPositiveBinSize {
            value: requested,
            fallback,
        })
    }
}

/// Resolve a bin size entered as a number or as text.
pub fn parse_bin_size(requested: &NumericParam, fallback: f64) -> Result<f64, ValidationError> {
    match requested {
        NumericParam::Number(value) => validate_bin_size(*value, fallback),
        NumericParam::Text(raw) => match raw.trim().parse::<f64>() {
            Ok(value) => validate_bin_size(value, fallback),
            Err(_) => Err(ValidationError::InvalidBinSize {
                value: raw.clone(),
                fallback,
            }),
        },
    }
}

/// Bin `items` by `value`.
///
/// Values that are negative or not finite are not binned. When `predicate` is
/// supplied every bin also reports how many of its members it accepts.
pub fn build_histogram<T: Clone>(
    items: &[T],
    bin_size: f64,
    fallback_bin_size: f64,
    value: impl Fn(&T) -> f64,
    predicate: Option<&dyn Fn(&T) -> bool>,
) -> Histogram<T> {
    let mut bin_size = validate_bin_size(bin_size, fallback_bin_size).unwrap_or(fallback_bin_size);

    let samples: Vec<(f64, &T)> = items
        .iter()
        .map(|item| (value(item), item))
        .filter(|(v, _)| v.is_finite() && *v >= 0.0)
        .collect();

    let max_value = samples
        .iter()
        .map(|(v, _)| *v)
        .fold(f64::NEG_INFINITY, f64::max);
    if samples.is_empty() || max_value <= 0.0 {
        return Histogram::empty(bin_size);
    }

    let mut bin_count = ((max_value / bin_size).ceil() as usize).max(1);
    if bin_count > MAX_BIN_COUNT {
        log::debug!(
            "Histogram would need {} bins of {}; widening to {} bins",
            bin_count,
            bin_size,
            MAX_BIN_COUNT
        );
        bin_size = max_value / MAX_BIN_COUNT as f64;
        bin_count = MAX_BIN_COUNT;
    }

    let mut bins: Vec<HistogramBin<T>> = (0..bin_count)
        .map(|index| HistogramBin {
            index,
            from: index as f64 * bin_size,
            to: (index + 1) as f64 * bin_size,
            count: 0,
            items: Vec::new(),
            match_count: predicate.map(|_| 0),
        })
        .collect();

    for (v, item) in samples {
        // Clamp absorbs the exact maximum and floating-point overflow at the edge.
        let index = ((v / bin_size).floor() as usize).min(bin_count - 1);
        let bin = &mut bins[index];
        bin.count += 1;
        if let (Some(matches), Some(accepts)) = (bin.match_count.as_mut(), predicate) {
            if accepts(item) {
                *matches += 1;
            }
        }
        bin.items.push(item.clone());
    }

    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0);

    Histogram {
        bin_size,
        bins,
        max_count,
    }
}

/// Histogram of completion records by `duration_minutes`, tagged by the hypothesis.
pub fn duration_histogram(
    records: &[CompletionRecord],
    bin_size: f64,
    predicate: Option<&dyn Fn(&CompletionRecord) -> bool>,
) -> Histogram<CompletionRecord> {
    build_histogram(
        records,
        bin_size,
        DEFAULT_DURATION_BIN_SIZE,
        |r| r.duration_minutes,
        predicate,
    )
}

/// Histogram of normalized rows by minutes per unit of measure.
pub fn normalized_histogram(rows: &[NormalizedRow], bin_size: f64) -> Histogram<NormalizedRow> {
    build_histogram(
        rows,
        bin_size,
        DEFAULT_NORMALIZED_BIN_SIZE,
        |r| r.normalized_minutes,
        None,
    )
}

#[cfg(test)]
#[path = "histogram_tests.rs"]
mod histogram_tests;
