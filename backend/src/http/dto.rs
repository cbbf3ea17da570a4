//! Data Transfer Objects for the HTTP API.
//!
//! Analysis DTOs are re-exported from [`crate::api`] since they already derive
//! Serialize/Deserialize.

use serde::{Deserialize, Serialize};

pub use crate::api::{
    AnalysisParams, PanelDefinition, TaskAnalysisData, TaskAnalysisRequest, TaskExecution,
};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Body of `POST /v1/task-analysis`.
///
/// `params` is kept as raw JSON so the fields a client sends can be laid over
/// the server's configured defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskAnalysisBody {
    #[serde(default)]
    pub executions: Vec<TaskExecution>,
    #[serde(default)]
    pub panels: Vec<PanelDefinition>,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Lay the fields present in `overrides` over `defaults`.
pub fn merge_params(
    defaults: &AnalysisParams,
    overrides: serde_json::Value,
) -> Result<AnalysisParams, serde_json::Error> {
    let mut merged = serde_json::to_value(defaults)?;
    match overrides {
        serde_json::Value::Null => {}
        serde_json::Value::Object(fields) => {
            if let Some(base) = merged.as_object_mut() {
                base.extend(fields);
            }
        }
        other => merged = other,
    }
    serde_json::from_value(merged)
}

impl TaskAnalysisBody {
    pub fn into_request(
        self,
        defaults: &AnalysisParams,
    ) -> Result<TaskAnalysisRequest, serde_json::Error> {
        Ok(TaskAnalysisRequest {
            executions: self.executions,
            panels: self.panels,
            params: merge_params(defaults, self.params)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{DurationStrategy, NumericParam, TaskDefinitionId};
    use serde_json::json;

    #[test]
    fn test_merge_keeps_unsent_defaults() {
        let defaults = AnalysisParams {
            bin_size: 2.0.into(),
            utc_offset_minutes: -180,
            ..AnalysisParams::default()
        };
        let params = merge_params(&defaults, json!({"min_multiplier": 0.8})).unwrap();

        assert_eq!(params.bin_size, NumericParam::Number(2.0));
        assert_eq!(params.utc_offset_minutes, -180);
        assert_eq!(params.min_multiplier, NumericParam::Number(0.8));
    }

    #[test]
    fn test_merge_null_returns_defaults() {
        let defaults = AnalysisParams::default();
        assert_eq!(merge_params(&defaults, serde_json::Value::Null).unwrap(), defaults);
    }

    #[test]
    fn test_merge_strategy() {
        let params = merge_params(
            &AnalysisParams::default(),
            json!({"strategy": {"mode": "task", "task_definition_id": 12}}),
        )
        .unwrap();
        assert_eq!(
            params.strategy,
            DurationStrategy::Task {
                task_definition_id: TaskDefinitionId(12)
            }
        );
    }

    #[test]
    fn test_merge_keeps_textual_numbers() {
        let params = merge_params(
            &AnalysisParams::default(),
            json!({"min_multiplier": "abc", "bin_size": "2.5"}),
        )
        .unwrap();
        assert_eq!(params.min_multiplier, NumericParam::Text("abc".to_string()));
        assert_eq!(params.bin_size, NumericParam::Text("2.5".to_string()));
    }

    #[test]
    fn test_merge_rejects_wrong_types() {
        assert!(merge_params(&AnalysisParams::default(), json!({"show_regression": "yes"})).is_err());
        assert!(merge_params(&AnalysisParams::default(), json!({"bin_size": [5]})).is_err());
        assert!(merge_params(&AnalysisParams::default(), json!([1, 2])).is_err());
    }
}
