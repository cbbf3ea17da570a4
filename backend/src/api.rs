//! Public API surface for the analytics engine.
//!
//! This file consolidates the request and response types exchanged with the
//! presentation layer. All types derive Serialize/Deserialize for JSON
//! serialization and carry no behavior.

pub use crate::algorithms::duration::DurationStrategy;
pub use crate::models::{
    CompletionRecord, PanelDefinition, PanelDefinitionId, Pause, PlanId, TaskDefinitionId,
    TaskExecution,
};
pub use crate::services::hypothesis::{HypothesisConfig, HypothesisField};
pub use crate::services::normalization::{NormalizationMetric, ValueRange};

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Descriptive statistics for a sample set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub p10: f64,
    pub p90: f64,
}

/// One fixed-width histogram bucket `[from, to)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin<T> {
    pub index: usize,
    pub from: f64,
    pub to: f64,
    pub count: usize,
    pub items: Vec<T>,
    /// Members accepted by the active hypothesis; absent when none was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_count: Option<usize>,
}

/// Contiguous equal-width bins covering `[0, bins.len() * bin_size)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Histogram<T> {
    pub bin_size: f64,
    pub bins: Vec<HistogramBin<T>>,
    pub max_count: usize,
}

impl<T> Histogram<T> {
    pub fn empty(bin_size: f64) -> Self {
        Self {
            bin_size,
            bins: Vec::new(),
            max_count: 0,
        }
    }

    /// Items placed across all bins.
    pub fn total_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// A completion record expressed per unit of physical measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub plan_id: Option<PlanId>,
    pub house_identifier: Option<String>,
    pub module_number: Option<i32>,
    pub panel_definition_id: PanelDefinitionId,
    pub panel_code: Option<String>,
    pub group: Option<String>,
    pub house_type_name: Option<String>,
    pub task_name: Option<String>,
    pub worker_name: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub actual_minutes: f64,
    /// Area in m² or length in m, depending on the metric.
    pub measure: f64,
    pub normalized_minutes: f64,
}

/// One sample of the regression confidence band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidencePoint {
    pub x: f64,
    pub predicted_y: f64,
    pub lower_y: f64,
    pub upper_y: f64,
}

/// Ordinary-least-squares fit with goodness-of-fit statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionResult {
    pub slope: f64,
    pub intercept: f64,
    /// Undefined when every y is identical.
    pub correlation: Option<f64>,
    pub r_squared: Option<f64>,
    /// Only defined for more than two samples.
    pub adjusted_r_squared: Option<f64>,
    pub rmse: f64,
    pub mae: f64,
    pub mean_x: f64,
    pub mean_y: f64,
    pub min_x: f64,
    pub max_x: f64,
    pub predicted_at_min_x: f64,
    pub predicted_at_max_x: f64,
    pub sample_count: usize,
    pub residual_std_error: Option<f64>,
    pub t_critical: Option<f64>,
    pub confidence_band: Option<Vec<ConfidencePoint>>,
}

/// Duration statistics for records matching a hypothesis versus the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortComparison {
    pub matching: Option<SummaryStats>,
    pub others: Option<SummaryStats>,
    pub mean_difference: Option<f64>,
    pub median_difference: Option<f64>,
}

/// The compiled hypothesis and its effect on the included records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisSummary {
    pub description: String,
    pub match_count: usize,
    pub comparison: CohortComparison,
}

/// Why records were left out of the normalized view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationExclusions {
    pub unknown_panel: usize,
    pub missing_measure: usize,
    pub non_positive_duration: usize,
    pub out_of_range: usize,
}

impl NormalizationExclusions {
    pub fn total(&self) -> usize {
        self.unknown_panel + self.missing_measure + self.non_positive_duration + self.out_of_range
    }
}

/// Per-unit-of-measure view of the included records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAnalysis {
    pub metric: NormalizationMetric,
    pub range: ValueRange,
    pub rows: Vec<NormalizedRow>,
    pub excluded: NormalizationExclusions,
    pub stats: Option<SummaryStats>,
    pub histogram: Histogram<NormalizedRow>,
    pub regression: Option<RegressionResult>,
}

/// A numeric parameter as entered: a JSON number or free text parsed later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericParam {
    Number(f64),
    Text(String),
}

impl From<f64> for NumericParam {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl fmt::Display for NumericParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{}", value),
            Self::Text(raw) => f.write_str(raw),
        }
    }
}

/// User-adjustable parameters of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    pub strategy: DurationStrategy,
    pub bin_size: NumericParam,
    pub min_multiplier: NumericParam,
    pub max_multiplier: NumericParam,
    pub hypothesis: Option<HypothesisConfig>,
    pub metric: NormalizationMetric,
    pub normalized_range: ValueRange,
    pub normalized_bin_size: NumericParam,
    pub show_regression: bool,
    /// Reference offset for date hypotheses, in minutes east of UTC.
    pub utc_offset_minutes: i32,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            strategy: DurationStrategy::Panel,
            bin_size: crate::services::histogram::DEFAULT_DURATION_BIN_SIZE.into(),
            min_multiplier: crate::services::band_filter::DEFAULT_MIN_MULTIPLIER.into(),
            max_multiplier: crate::services::band_filter::DEFAULT_MAX_MULTIPLIER.into(),
            hypothesis: None,
            metric: NormalizationMetric::Area,
            normalized_range: ValueRange::default(),
            normalized_bin_size: crate::services::histogram::DEFAULT_NORMALIZED_BIN_SIZE.into(),
            show_regression: true,
            utc_offset_minutes: 0,
        }
    }
}

/// A point-in-time snapshot plus the parameters to analyze it with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskAnalysisRequest {
    #[serde(default)]
    pub executions: Vec<TaskExecution>,
    #[serde(default)]
    pub panels: Vec<PanelDefinition>,
    #[serde(default)]
    pub params: AnalysisParams,
}

/// Complete analysis of one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskAnalysisData {
    pub strategy: DurationStrategy,
    pub included: Vec<CompletionRecord>,
    pub excluded: Vec<CompletionRecord>,
    /// Executions or panels dropped for lack of usable timing.
    pub skipped_count: usize,
    pub duration_stats: Option<SummaryStats>,
    pub expected_stats: Option<SummaryStats>,
    pub histogram: Histogram<CompletionRecord>,
    pub hypothesis: Option<HypothesisSummary>,
    pub normalized: NormalizedAnalysis,
    /// Messages for parameters that were rejected and replaced by defaults.
    pub validation_errors: Vec<String>,
}
