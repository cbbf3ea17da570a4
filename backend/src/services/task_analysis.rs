//! End-to-end analysis of one executions snapshot.
//!
//! Parameters are resolved first; anything the user got wrong is replaced by its
//! default and reported in `validation_errors`, so a call always produces a
//! complete [`TaskAnalysisData`].

use crate::algorithms::duration::derive_records;
use crate::algorithms::regression::fit_regression;
use crate::algorithms::stats::compute_summary;
use crate::api::{
    AnalysisParams, CompletionRecord, HypothesisSummary, NormalizationMetric, NormalizedAnalysis,
    NumericParam, TaskAnalysisData, TaskAnalysisRequest, ValueRange,
};
use crate::error::ValidationError;
use crate::models::time::utc_offset;
use crate::services::band_filter::{BandFilter, DEFAULT_MAX_MULTIPLIER, DEFAULT_MIN_MULTIPLIER};
use crate::services::compare::compute_cohort_comparison;
use crate::services::histogram::{
    duration_histogram, normalized_histogram, parse_bin_size, DEFAULT_DURATION_BIN_SIZE,
    DEFAULT_NORMALIZED_BIN_SIZE,
};
use crate::services::hypothesis::Hypothesis;
use crate::services::normalization::normalize_records;

/// Parameters after validation.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedParams {
    pub bin_size: f64,
    pub normalized_bin_size: f64,
    pub band: BandFilter,
    pub hypothesis: Option<Hypothesis>,
    pub metric: NormalizationMetric,
    pub range: ValueRange,
    pub show_regression: bool,
}

fn multiplier_or(param: &NumericParam, fallback: f64, errors: &mut Vec<ValidationError>) -> f64 {
    BandFilter::parse_multiplier(&param.to_string()).unwrap_or_else(|e| {
        errors.push(e);
        fallback
    })
}

/// Validate `params`, substituting defaults for rejected values.
pub(crate) fn resolve_params(params: &AnalysisParams) -> (ResolvedParams, Vec<ValidationError>) {
    let mut errors = Vec::new();

    let bin_size = parse_bin_size(&params.bin_size, DEFAULT_DURATION_BIN_SIZE)
        .unwrap_or_else(|e| {
            errors.push(e);
            DEFAULT_DURATION_BIN_SIZE
        });
    let normalized_bin_size =
        parse_bin_size(&params.normalized_bin_size, DEFAULT_NORMALIZED_BIN_SIZE).unwrap_or_else(
            |e| {
                errors.push(e);
                DEFAULT_NORMALIZED_BIN_SIZE
            },
        );

    let band = BandFilter::new(
        multiplier_or(&params.min_multiplier, DEFAULT_MIN_MULTIPLIER, &mut errors),
        multiplier_or(&params.max_multiplier, DEFAULT_MAX_MULTIPLIER, &mut errors),
    );

    let offset = utc_offset(params.utc_offset_minutes);
    let hypothesis = params
        .hypothesis
        .as_ref()
        .and_then(|config| match Hypothesis::compile(config, offset) {
            Ok(hypothesis) => Some(hypothesis),
            Err(e) => {
                errors.push(e);
                None
            }
        });

    let (range, range_errors) = params.normalized_range.sanitized();
    errors.extend(range_errors);

    let resolved = ResolvedParams {
        bin_size,
        normalized_bin_size,
        band,
        hypothesis,
        metric: params.metric,
        range,
        show_regression: params.show_regression,
    };
    (resolved, errors)
}

fn summarize_hypothesis(hypothesis: &Hypothesis, included: &[CompletionRecord]) -> HypothesisSummary {
    let match_count = included.iter().filter(|r| hypothesis.matches(r)).count();
    HypothesisSummary {
        description: hypothesis.description(),
        match_count,
        comparison: compute_cohort_comparison(included, |r| hypothesis.matches(r)),
    }
}

fn analyze_normalized(
    included: &[CompletionRecord],
    request: &TaskAnalysisRequest,
    params: &ResolvedParams,
) -> NormalizedAnalysis {
    let (rows, excluded) = normalize_records(included, &request.panels, params.metric, &params.range);

    let values: Vec<f64> = rows.iter().map(|r| r.normalized_minutes).collect();
    let stats = compute_summary(&values);
    let histogram = normalized_histogram(&rows, params.normalized_bin_size);

    let regression = if params.show_regression {
        let samples: Vec<(f64, f64)> = rows.iter().map(|r| (r.measure, r.actual_minutes)).collect();
        fit_regression(&samples)
    } else {
        None
    };

    NormalizedAnalysis {
        metric: params.metric,
        range: params.range,
        rows,
        excluded,
        stats,
        histogram,
        regression,
    }
}

/// Run the full analysis pipeline over one snapshot.
pub fn analyze(request: &TaskAnalysisRequest) -> TaskAnalysisData {
    let (params, errors) = resolve_params(&request.params);
    for error in &errors {
        log::debug!("Parameter rejected: {}", error);
    }

    let derivation = derive_records(&request.executions, request.params.strategy);
    let partition = params.band.partition(derivation.records);
    let included = partition.included;

    let durations: Vec<f64> = included.iter().map(|r| r.duration_minutes).collect();
    let expected: Vec<f64> = included
        .iter()
        .filter_map(|r| r.expected_minutes)
        .filter(|e| *e > 0.0)
        .collect();

    let histogram = match params.hypothesis.as_ref() {
        Some(hypothesis) => {
            let predicate = |r: &CompletionRecord| hypothesis.matches(r);
            duration_histogram(&included, params.bin_size, Some(&predicate))
        }
        None => duration_histogram(&included, params.bin_size, None),
    };

    let hypothesis = params
        .hypothesis
        .as_ref()
        .map(|h| summarize_hypothesis(h, &included));

    let normalized = analyze_normalized(&included, request, &params);

    log::info!(
        "Analyzed {} executions: {} included, {} excluded, {} skipped, {} normalized",
        request.executions.len(),
        included.len(),
        partition.excluded.len(),
        derivation.skipped,
        normalized.rows.len()
    );

    TaskAnalysisData {
        strategy: request.params.strategy,
        duration_stats: compute_summary(&durations),
        expected_stats: compute_summary(&expected),
        histogram,
        hypothesis,
        normalized,
        skipped_count: derivation.skipped,
        included,
        excluded: partition.excluded,
        validation_errors: errors.iter().map(ToString::to_string).collect(),
    }
}

#[cfg(test)]
#[path = "task_analysis_tests.rs"]
mod task_analysis_tests;
