//! Duration statistics of hypothesis matches against everything else.

use crate::algorithms::stats::compute_summary;
use crate::api::{CohortComparison, CompletionRecord};

/// Split `records` by `predicate` and compare the duration statistics of the two cohorts.
pub fn compute_cohort_comparison(
    records: &[CompletionRecord],
    predicate: impl Fn(&CompletionRecord) -> bool,
) -> CohortComparison {
    let (matching, others): (Vec<&CompletionRecord>, Vec<&CompletionRecord>) =
        records.iter().partition(|r| predicate(*r));

    let durations =
        |cohort: &[&CompletionRecord]| cohort.iter().map(|r| r.duration_minutes).collect::<Vec<_>>();

    let matching = compute_summary(&durations(&matching));
    let others = compute_summary(&durations(&others));

    let (mean_difference, median_difference) = match (&matching, &others) {
        (Some(m), Some(o)) => (Some(m.mean - o.mean), Some(m.median - o.median)),
        _ => (None, None),
    };

    CohortComparison {
        matching,
        others,
        mean_difference,
        median_difference,
    }
}

#[cfg(test)]
#[path = "compare_tests.rs"]
mod compare_tests;
