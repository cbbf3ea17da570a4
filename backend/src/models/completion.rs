//! Raw execution records and the completion records derived from them.
//!
//! These types mirror the rows returned by the external completions store. Every
//! field that the store may leave empty is an `Option`, so "absent" never turns
//! into a silent zero further down the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Plan identifier (house instance on the production line).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlanId(pub i64);

/// Panel definition identifier (catalog entry).
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PanelDefinitionId(pub i64);

/// Task definition identifier (task rule).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskDefinitionId(pub i64);

/// A pause recorded while a task was in progress.
///
/// Exactly one of `duration_minutes` / `duration_seconds` is authoritative;
/// minutes win when both are present and valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pause {
    #[serde(default)]
    pub paused_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resumed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_minutes: Option<f64>,
    #[serde(default)]
    pub duration_seconds: Option<f64>,
}

/// One task's raw timing as stored by the station terminals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskExecution {
    #[serde(default)]
    pub task_definition_id: Option<TaskDefinitionId>,
    #[serde(default)]
    pub task_name: Option<String>,
    #[serde(default)]
    pub station: Option<String>,
    #[serde(default)]
    pub plan_id: Option<PlanId>,
    #[serde(default)]
    pub house_identifier: Option<String>,
    #[serde(default)]
    pub house_type_name: Option<String>,
    #[serde(default)]
    pub module_number: Option<i32>,
    #[serde(default)]
    pub panel_definition_id: Option<PanelDefinitionId>,
    #[serde(default)]
    pub panel_code: Option<String>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Active minutes, pauses already excluded by the terminal.
    #[serde(default)]
    pub duration_minutes: Option<f64>,
    #[serde(default)]
    pub expected_minutes: Option<f64>,
    #[serde(default)]
    pub worker_name: Option<String>,
    #[serde(default)]
    pub pauses: Vec<Pause>,
}

/// One observed unit of finished work (a whole panel, or a single task instance).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub plan_id: Option<PlanId>,
    pub house_identifier: Option<String>,
    pub house_type_name: Option<String>,
    pub module_number: Option<i32>,
    pub panel_definition_id: Option<PanelDefinitionId>,
    pub panel_code: Option<String>,
    pub task_definition_id: Option<TaskDefinitionId>,
    pub task_name: Option<String>,
    /// Derived duration, always finite and non-negative.
    pub duration_minutes: f64,
    pub expected_minutes: Option<f64>,
    pub completed_at: Option<DateTime<Utc>>,
    /// One or more identities joined with commas.
    pub worker_name: Option<String>,
    /// Constituent executions when the record aggregates several tasks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub task_breakdown: Vec<TaskExecution>,
}

impl CompletionRecord {
    /// Ratio of actual to expected minutes, when a positive expectation exists.
    pub fn expected_ratio(&self) -> Option<f64> {
        match self.expected_minutes {
            Some(expected) if expected.is_finite() && expected > 0.0 => {
                Some(self.duration_minutes / expected)
            }
            _ => None,
        }
    }

    /// Individual worker identities, trimmed, without empty entries.
    pub fn workers(&self) -> impl Iterator<Item = &str> {
        self.worker_name
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|w| !w.is_empty())
    }
}

/// Panel catalog entry supplying the physical measures used for normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelDefinition {
    pub panel_definition_id: PanelDefinitionId,
    #[serde(default)]
    pub panel_code: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub house_type_name: Option<String>,
    #[serde(default)]
    pub area_m2: Option<f64>,
    #[serde(default)]
    pub length_m: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_ratio() {
        let record = CompletionRecord {
            duration_minutes: 25.0,
            expected_minutes: Some(10.0),
            ..Default::default()
        };
        assert_eq!(record.expected_ratio(), Some(2.5));
    }

    #[test]
    fn test_expected_ratio_undefined_without_positive_expectation() {
        let mut record = CompletionRecord {
            duration_minutes: 25.0,
            expected_minutes: Some(0.0),
            ..Default::default()
        };
        assert_eq!(record.expected_ratio(), None);

        record.expected_minutes = None;
        assert_eq!(record.expected_ratio(), None);

        record.expected_minutes = Some(f64::NAN);
        assert_eq!(record.expected_ratio(), None);
    }

    #[test]
    fn test_workers_split() {
        let record = CompletionRecord {
            worker_name: Some("Ana Pérez, Luis Soto,, ".to_string()),
            ..Default::default()
        };
        let workers: Vec<&str> = record.workers().collect();
        assert_eq!(workers, vec!["Ana Pérez", "Luis Soto"]);
    }

    #[test]
    fn test_task_execution_deserialize_sparse() {
        let json = r#"{"started_at": "2024-01-01T08:00:00Z", "duration_minutes": 12.5}"#;
        let exec: TaskExecution = serde_json::from_str(json).unwrap();
        assert_eq!(exec.duration_minutes, Some(12.5));
        assert!(exec.pauses.is_empty());
        assert!(exec.completed_at.is_none());
    }
}
