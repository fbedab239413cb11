//! User goal model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// What a goal measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Steps,
    Weight,
    Calories,
    Water,
    Sleep,
    Custom,
}

impl GoalType {
    /// Unit used when the caller does not name one.
    pub fn default_unit(self) -> &'static str {
        match self {
            GoalType::Steps => "steps",
            GoalType::Weight => "kg",
            GoalType::Calories => "kcal",
            GoalType::Water => "ml",
            GoalType::Sleep => "hours",
            GoalType::Custom => "",
        }
    }
}

/// Stored goal record.
///
/// Stored at: `users/{uid}/goals/{goalId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct UserGoal {
    pub goal_id: String,
    pub user_id: String,
    pub goal_type: GoalType,
    pub target_value: f64,
    pub unit: String,
    /// First active day (YYYY-MM-DD)
    pub start_date: String,
    /// Last active day (YYYY-MM-DD)
    pub end_date: String,
    pub active: bool,
    /// Percentage-of-target snapshot from the last progress update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<i64>,
    #[serde(with = "firestore::serialize_as_timestamp")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
    #[serde(with = "firestore::serialize_as_timestamp")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub updated_at: DateTime<Utc>,
}

/// Goal as submitted for create or update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct UserGoalInput {
    #[serde(default)]
    pub goal_id: Option<String>,
    pub goal_type: GoalType,
    pub target_value: f64,
    #[serde(default)]
    pub unit: Option<String>,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub active: Option<bool>,
}

impl UserGoalInput {
    pub fn new(
        goal_type: GoalType,
        target_value: f64,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            goal_id: None,
            goal_type,
            target_value,
            unit: None,
            start_date: start_date.into(),
            end_date: end_date.into(),
            active: None,
        }
    }
}
