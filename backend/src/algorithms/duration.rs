//! Duration derivation: raw executions to completion records.
//!
//! Two strategies, chosen by the caller:
//!
//! - [`DurationStrategy::Task`]: one record per execution of the selected task,
//!   carrying the execution's own active minutes.
//! - [`DurationStrategy::Panel`]: one record per panel instance, carrying the
//!   wall-clock length of the union of every execution's pause-free interval.
//!
//! Summing task durations for a panel would double-count concurrent work, so the
//! two paths never share a code path for the duration itself.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::algorithms::intervals::{subtract_intervals, union_length_minutes, Interval};
use crate::algorithms::pauses::{exclusion_windows, total_pause_minutes};
use crate::models::time::minutes_between;
use crate::models::{CompletionRecord, PanelDefinitionId, PlanId, TaskDefinitionId, TaskExecution};

/// How completion records are derived from executions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DurationStrategy {
    /// A single task is selected; each execution becomes one record.
    Task { task_definition_id: TaskDefinitionId },
    /// Executions are grouped per panel instance and merged on the wall clock.
    #[default]
    Panel,
}

/// Output of a derivation run.
#[derive(Debug, Clone, Default)]
pub struct Derivation {
    pub records: Vec<CompletionRecord>,
    /// Executions (task mode) or panels (panel mode) with no usable timing.
    pub skipped: usize,
}

/// Panel instance key: one physical panel built for one plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct PanelKey {
    plan_id: PlanId,
    module_number: Option<i32>,
    panel_definition_id: PanelDefinitionId,
}

fn valid_non_negative(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}

/// Active minutes of a single execution.
///
/// Uses the recorded value when valid, otherwise the elapsed time between start
/// and completion minus the recorded pauses (floored at zero).
pub fn task_active_minutes(execution: &TaskExecution) -> Option<f64> {
    if let Some(recorded) = valid_non_negative(execution.duration_minutes) {
        return Some(recorded);
    }

    let (started_at, completed_at) = (execution.started_at?, execution.completed_at?);
    if completed_at < started_at {
        return None;
    }
    let elapsed = minutes_between(started_at, completed_at);
    Some((elapsed - total_pause_minutes(&execution.pauses)).max(0.0))
}

/// Pause-free wall-clock pieces of one execution.
pub fn active_intervals(execution: &TaskExecution) -> Vec<Interval> {
    match (execution.started_at, execution.completed_at) {
        (Some(started_at), Some(completed_at)) => subtract_intervals(
            Interval::new(started_at, completed_at),
            &exclusion_windows(&execution.pauses),
        ),
        _ => vec![],
    }
}

/// Wall-clock minutes covered by any of the executions' active pieces.
pub fn panel_wall_clock_minutes<'a>(
    executions: impl IntoIterator<Item = &'a TaskExecution>,
) -> f64 {
    let pieces: Vec<Interval> = executions.into_iter().flat_map(active_intervals).collect();
    union_length_minutes(&pieces)
}

/// Derive completion records from a flat execution snapshot.
pub fn derive_records(executions: &[TaskExecution], strategy: DurationStrategy) -> Derivation {
    match strategy {
        DurationStrategy::Task { task_definition_id } => {
            derive_task_records(executions, task_definition_id)
        }
        DurationStrategy::Panel => derive_panel_records(executions),
    }
}

fn derive_task_records(executions: &[TaskExecution], task: TaskDefinitionId) -> Derivation {
    let mut derivation = Derivation::default();

    for execution in executions
        .iter()
        .filter(|e| e.task_definition_id == Some(task))
    {
        match task_active_minutes(execution) {
            Some(duration_minutes) => derivation.records.push(CompletionRecord {
                plan_id: execution.plan_id,
                house_identifier: execution.house_identifier.clone(),
                house_type_name: execution.house_type_name.clone(),
                module_number: execution.module_number,
                panel_definition_id: execution.panel_definition_id,
                panel_code: execution.panel_code.clone(),
                task_definition_id: execution.task_definition_id,
                task_name: execution.task_name.clone(),
                duration_minutes,
                expected_minutes: valid_non_negative(execution.expected_minutes),
                completed_at: execution.completed_at,
                worker_name: execution.worker_name.clone(),
                task_breakdown: vec![],
            }),
            None => {
                log::debug!(
                    "Skipping execution of task {:?} on plan {:?}: no usable duration",
                    task,
                    execution.plan_id
                );
                derivation.skipped += 1;
            }
        }
    }

    derivation
}

fn derive_panel_records(executions: &[TaskExecution]) -> Derivation {
    let mut derivation = Derivation::default();
    let mut panels: BTreeMap<PanelKey, Vec<&TaskExecution>> = BTreeMap::new();

    for execution in executions {
        match (execution.plan_id, execution.panel_definition_id) {
            (Some(plan_id), Some(panel_definition_id)) => {
                let key = PanelKey {
                    plan_id,
                    module_number: execution.module_number,
                    panel_definition_id,
                };
                panels.entry(key).or_default().push(execution);
            }
            _ => {
                log::debug!(
                    "Skipping execution of task {:?}: not attributable to a panel",
                    execution.task_definition_id
                );
                derivation.skipped += 1;
            }
        }
    }

    for (key, group) in panels {
        match build_panel_record(key, &group) {
            Some(record) => derivation.records.push(record),
            None => {
                log::debug!(
                    "Skipping panel {:?} of plan {:?}: no timed executions",
                    key.panel_definition_id,
                    key.plan_id
                );
                derivation.skipped += 1;
            }
        }
    }

    derivation
}

fn first_text(
    group: &[&TaskExecution],
    field: impl Fn(&TaskExecution) -> Option<&String>,
) -> Option<String> {
    group.iter().find_map(|e| field(*e)).cloned()
}

fn build_panel_record(key: PanelKey, group: &[&TaskExecution]) -> Option<CompletionRecord> {
    let has_interval = group.iter().any(|e| !active_intervals(e).is_empty());
    if !has_interval {
        return None;
    }
    let duration_minutes = panel_wall_clock_minutes(group.iter().copied());

    let expected: Vec<f64> = group
        .iter()
        .filter_map(|e| e.expected_minutes)
        .filter(|v| v.is_finite() && *v > 0.0)
        .collect();
    let expected_minutes = if expected.is_empty() {
        None
    } else {
        Some(expected.iter().sum())
    };

    let mut workers: Vec<&str> = Vec::new();
    for name in group
        .iter()
        .filter_map(|e| e.worker_name.as_deref())
        .flat_map(|names| names.split(','))
        .map(str::trim)
        .filter(|w| !w.is_empty())
    {
        if !workers.contains(&name) {
            workers.push(name);
        }
    }

    let mut task_breakdown: Vec<TaskExecution> = group.iter().map(|e| (*e).clone()).collect();
    task_breakdown.sort_by_key(|e| (e.started_at.is_none(), e.started_at));

    Some(CompletionRecord {
        plan_id: Some(key.plan_id),
        house_identifier: first_text(group, |e| e.house_identifier.as_ref()),
        house_type_name: first_text(group, |e| e.house_type_name.as_ref()),
        module_number: key.module_number,
        panel_definition_id: Some(key.panel_definition_id),
        panel_code: first_text(group, |e| e.panel_code.as_ref()),
        task_definition_id: None,
        task_name: None,
        duration_minutes,
        expected_minutes,
        completed_at: group.iter().filter_map(|e| e.completed_at).max(),
        worker_name: if workers.is_empty() {
            None
        } else {
            Some(workers.join(", "))
        },
        task_breakdown,
    })
}
