// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Daily health log model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Where a log's numbers came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    #[default]
    Manual,
    Device,
    Imported,
}

/// Stored health log record in Firestore.
///
/// Stored at: `users/{uid}/healthLogs/{logId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct HealthLog {
    /// Document ID (derived `{userId}_{date}` unless given explicitly)
    pub log_id: String,
    /// Owning user
    pub user_id: String,
    /// Calendar date (YYYY-MM-DD)
    pub date: String,
    pub steps: i64,
    /// kcal
    pub calories_consumed: f64,
    /// kcal
    pub calories_burned: f64,
    /// Milliliters
    pub water_intake: f64,
    /// Hours
    pub sleep_duration: f64,
    /// Beats per minute
    pub heart_rate: i64,
    /// BMI from the profile at save time (0 when no profile exists)
    pub bmi: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub data_source: DataSource,
    /// Soft-delete flag; deleted logs stay in storage.
    #[serde(default)]
    pub deleted: bool,
    #[serde(
        default,
        with = "firestore::serialize_as_optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(with = "firestore::serialize_as_timestamp")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
    #[serde(with = "firestore::serialize_as_timestamp")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub updated_at: DateTime<Utc>,
}

impl HealthLog {
    /// Composite document key for a user's log on a given date.
    ///
    /// One log per user per day follows from using this as the document ID.
    pub fn derive_id(user_id: &str, date: &str) -> String {
        format!("{}_{}", user_id, date)
    }

    /// Build a full log from a partial input. Absent numbers become zero.
    pub fn from_input(
        input: &HealthLogInput,
        log_id: String,
        user_id: &str,
        date: String,
        bmi: f64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            log_id,
            user_id: user_id.to_string(),
            date,
            steps: input.steps.unwrap_or(0),
            calories_consumed: input.calories_consumed.unwrap_or(0.0),
            calories_burned: input.calories_burned.unwrap_or(0.0),
            water_intake: input.water_intake.unwrap_or(0.0),
            sleep_duration: input.sleep_duration.unwrap_or(0.0),
            heart_rate: input.heart_rate.unwrap_or(0),
            bmi,
            notes: input.notes.clone(),
            data_source: input.data_source.unwrap_or_default(),
            deleted: false,
            deleted_at: None,
            created_at,
            updated_at,
        }
    }
}

/// Partial log as submitted by a form or an import.
///
/// `bmi` is deliberately absent: it is always recomputed from the profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
#[serde(default, rename_all = "camelCase")]
pub struct HealthLogInput {
    pub log_id: Option<String>,
    pub date: Option<String>,
    pub steps: Option<i64>,
    pub calories_consumed: Option<f64>,
    pub calories_burned: Option<f64>,
    pub water_intake: Option<f64>,
    pub sleep_duration: Option<f64>,
    pub heart_rate: Option<i64>,
    pub notes: Option<String>,
    pub data_source: Option<DataSource>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub created_at: Option<DateTime<Utc>>,
}

impl HealthLogInput {
    /// Input for a given date with every metric absent.
    pub fn for_date(date: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            ..Default::default()
        }
    }
}
