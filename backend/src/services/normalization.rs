//! Duration per unit of physical measure (minutes per m² or per m).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::{NormalizationExclusions, NormalizedRow};
use crate::error::ValidationError;
use crate::models::{CompletionRecord, PanelDefinition, PanelDefinitionId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizationMetric {
    #[default]
    Area,
    Length,
}

impl NormalizationMetric {
    /// The panel's measure for this metric, when it is usable as a divisor.
    pub fn measure(self, panel: &PanelDefinition) -> Option<f64> {
        let value = match self {
            Self::Area => panel.area_m2,
            Self::Length => panel.length_m,
        };
        value.filter(|v| v.is_finite() && *v > 0.0)
    }
}

/// Optional inclusive bounds on the normalized value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl ValueRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Drop non-finite bounds and order the remaining ones.
    pub fn sanitized(self) -> (Self, Vec<ValidationError>) {
        let mut errors = Vec::new();
        let mut keep = |bound: Option<f64>| match bound {
            Some(v) if !v.is_finite() => {
                errors.push(ValidationError::InvalidRangeBound(v));
                None
            }
            other => other,
        };
        let min = keep(self.min);
        let max = keep(self.max);

        let range = match (min, max) {
            (Some(a), Some(b)) if a > b => Self::new(Some(b), Some(a)),
            _ => Self::new(min, max),
        };
        (range, errors)
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// Why a record has no normalized row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    UnknownPanel,
    MissingMeasure,
    NonPositiveDuration,
    OutOfRange,
}

/// Panel catalog indexed by definition id.
pub type PanelCatalog<'a> = HashMap<PanelDefinitionId, &'a PanelDefinition>;

pub fn index_panels(panels: &[PanelDefinition]) -> PanelCatalog<'_> {
    panels.iter().map(|p| (p.panel_definition_id, p)).collect()
}

/// Normalize a single record. `range` must already be sanitized.
pub fn normalize_record(
    record: &CompletionRecord,
    catalog: &PanelCatalog<'_>,
    metric: NormalizationMetric,
    range: &ValueRange,
) -> Result<NormalizedRow, Exclusion> {
    let panel = record
        .panel_definition_id
        .and_then(|id| catalog.get(&id))
        .ok_or(Exclusion::UnknownPanel)?;
    let measure = metric.measure(panel).ok_or(Exclusion::MissingMeasure)?;

    let actual = record.duration_minutes;
    if !actual.is_finite() || actual <= 0.0 {
        return Err(Exclusion::NonPositiveDuration);
    }

    let normalized = actual / measure;
    if !range.contains(normalized) {
        return Err(Exclusion::OutOfRange);
    }

    Ok(NormalizedRow {
        plan_id: record.plan_id,
        house_identifier: record.house_identifier.clone(),
        module_number: record.module_number,
        panel_definition_id: panel.panel_definition_id,
        panel_code: record
            .panel_code
            .clone()
            .or_else(|| panel.panel_code.clone()),
        group: panel.group.clone(),
        house_type_name: record
            .house_type_name
            .clone()
            .or_else(|| panel.house_type_name.clone()),
        task_name: record.task_name.clone(),
        worker_name: record.worker_name.clone(),
        completed_at: record.completed_at,
        actual_minutes: actual,
        measure,
        normalized_minutes: normalized,
    })
}

/// Normalize every record, counting the ones left out by reason.
pub fn normalize_records(
    records: &[CompletionRecord],
    panels: &[PanelDefinition],
    metric: NormalizationMetric,
    range: &ValueRange,
) -> (Vec<NormalizedRow>, NormalizationExclusions) {
    let catalog = index_panels(panels);
    let mut rows = Vec::with_capacity(records.len());
    let mut excluded = NormalizationExclusions::default();

    for record in records {
        match normalize_record(record, &catalog, metric, range) {
            Ok(row) => rows.push(row),
            Err(reason) => {
                log::debug!(
                    "Record for panel {:?} not normalized: {:?}",
                    record.panel_definition_id,
                    reason
                );
                match reason {
                    Exclusion::UnknownPanel => excluded.unknown_panel += 1,
                    Exclusion::MissingMeasure => excluded.missing_measure += 1,
                    Exclusion::NonPositiveDuration => excluded.non_positive_duration += 1,
                    Exclusion::OutOfRange => excluded.out_of_range += 1,
                }
            }
        }
    }

    (rows, excluded)
}
