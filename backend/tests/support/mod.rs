#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use task_analytics::api::{
    PanelDefinition, PanelDefinitionId, Pause, PlanId, TaskDefinitionId, TaskExecution,
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the variables on unwind and serializes access to the process-global
/// environment, since tests run in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// A minute on the shared test day, 2024-05-01 (UTC).
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, hour, minute, 0).unwrap()
}

/// An execution of `task` on panel `panel` of plan `plan`, timed by its timestamps only.
pub fn execution(
    plan: i64,
    panel: i64,
    task: i64,
    start: (u32, u32),
    end: (u32, u32),
    worker: &str,
) -> TaskExecution {
    TaskExecution {
        task_definition_id: Some(TaskDefinitionId(task)),
        task_name: Some(format!("Task {}", task)),
        station: Some("W1".to_string()),
        plan_id: Some(PlanId(plan)),
        house_identifier: Some(format!("H-{}", plan)),
        house_type_name: Some("Type A".to_string()),
        module_number: Some(1),
        panel_definition_id: Some(PanelDefinitionId(panel)),
        panel_code: Some(format!("W-{}", panel)),
        started_at: Some(at(start.0, start.1)),
        completed_at: Some(at(end.0, end.1)),
        worker_name: Some(worker.to_string()),
        ..Default::default()
    }
}

/// A pause of `minutes` starting at `start`.
pub fn pause(start: (u32, u32), minutes: f64) -> Pause {
    Pause {
        paused_at: Some(at(start.0, start.1)),
        resumed_at: None,
        duration_minutes: Some(minutes),
        duration_seconds: None,
    }
}

pub fn panel(id: i64, area_m2: f64, length_m: f64) -> PanelDefinition {
    PanelDefinition {
        panel_definition_id: PanelDefinitionId(id),
        panel_code: Some(format!("W-{}", id)),
        group: Some("Walls".to_string()),
        house_type_name: Some("Type A".to_string()),
        area_m2: Some(area_m2),
        length_m: Some(length_m),
    }
}
