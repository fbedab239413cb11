// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile and daily health-log persistence.
//!
//! Logs are keyed `{userId}_{date}` unless the caller supplies an ID, so
//! saving twice for the same day overwrites one document. BMI on a log is
//! always recomputed from the profile at save time.
//!
//! Soft-deleted logs are NOT filtered from the read queries; callers see
//! the `deleted` flag and decide.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{HealthLog, HealthLogInput, UserProfile, UserProfilePatch};
use crate::time_utils::{format_date, parse_date, today};
use chrono::Utc;

/// Log an external-call failure and tag it with the operation.
fn failed<'a>(user_id: &'a str, action: &'static str) -> impl FnOnce(AppError) -> AppError + 'a {
    move |e| {
        tracing::error!(user_id, error = %e, "Failed to {}", action);
        e.context(action)
    }
}

/// Profile and health-log reads and writes.
#[derive(Clone)]
pub struct HealthService {
    db: FirestoreDb,
    recent_logs_limit: u32,
}

impl HealthService {
    pub fn new(db: FirestoreDb, recent_logs_limit: u32) -> Self {
        Self {
            db,
            recent_logs_limit,
        }
    }

    // ─── Profiles ────────────────────────────────────────────────

    /// Merge a partial profile over the stored one and stamp `updatedAt`.
    pub async fn save_user_profile(
        &self,
        user_id: &str,
        patch: &UserProfilePatch,
    ) -> Result<(), AppError> {
        self.db
            .merge_profile(user_id, patch, Utc::now())
            .await
            .map_err(failed(user_id, "save user profile"))?;

        tracing::info!(
            user_id,
            fields = ?patch.field_mask(),
            "Profile saved"
        );
        Ok(())
    }

    /// The user's profile, or `None` before onboarding.
    pub async fn get_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AppError> {
        tracing::debug!(user_id, "Fetching profile");
        self.db
            .get_profile(user_id)
            .await
            .map_err(failed(user_id, "get user profile"))
    }

    // ─── Health Logs ─────────────────────────────────────────────

    /// Upsert a day's log and return what was stored.
    ///
    /// Absent metrics are stored as zero. `createdAt` is kept from an existing
    /// document with the same ID, so only the first save sets it.
    pub async fn save_health_log(
        &self,
        user_id: &str,
        input: &HealthLogInput,
    ) -> Result<HealthLog, AppError> {
        let raw_date = input
            .date
            .as_deref()
            .ok_or_else(|| AppError::BadRequest("Health log date is required".to_string()))?;
        let date = format_date(&parse_date(raw_date)?);

        let log_id = input
            .log_id
            .clone()
            .unwrap_or_else(|| HealthLog::derive_id(user_id, &date));

        let profile = self
            .db
            .get_profile(user_id)
            .await
            .map_err(failed(user_id, "save health log"))?;
        let bmi = profile.as_ref().and_then(UserProfile::bmi).unwrap_or(0.0);

        let existing = self
            .db
            .get_health_log(user_id, &log_id)
            .await
            .map_err(failed(user_id, "save health log"))?;

        let now = Utc::now();
        let created_at = existing
            .map(|log| log.created_at)
            .or(input.created_at)
            .unwrap_or(now);

        let log = HealthLog::from_input(input, log_id, user_id, date, bmi, created_at, now);

        self.db
            .set_health_log(user_id, &log)
            .await
            .map_err(failed(user_id, "save health log"))?;

        tracing::info!(user_id, log_id = %log.log_id, date = %log.date, "Health log saved");
        Ok(log)
    }

    /// The log recorded for `date` (YYYY-MM-DD), if any.
    pub async fn get_health_log_by_date(
        &self,
        user_id: &str,
        date: &str,
    ) -> Result<Option<HealthLog>, AppError> {
        let date = format_date(&parse_date(date)?);
        tracing::debug!(user_id, date = %date, "Fetching health log by date");

        self.db
            .find_health_log_by_date(user_id, &date)
            .await
            .map_err(failed(user_id, "get health log"))
    }

    /// Most recent logs, newest first. `limit` defaults to the configured page size.
    pub async fn get_recent_health_logs(
        &self,
        user_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<HealthLog>, AppError> {
        let limit = limit.unwrap_or(self.recent_logs_limit);
        tracing::debug!(user_id, limit, "Fetching recent health logs");

        self.db
            .recent_health_logs(user_id, limit)
            .await
            .map_err(failed(user_id, "get health logs"))
    }

    /// Logs between two dates inclusive, newest first.
    pub async fn get_health_logs_by_date_range(
        &self,
        user_id: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<HealthLog>, AppError> {
        let start = format_date(&parse_date(start_date)?);
        let end = format_date(&parse_date(end_date)?);
        if start > end {
            tracing::warn!(user_id, start = %start, end = %end, "Inverted date range");
        }

        self.db
            .health_logs_in_range(user_id, &start, &end)
            .await
            .map_err(failed(user_id, "get health logs by date range"))
    }

    /// Soft-delete: flag the log and stamp `deletedAt`. The document stays.
    pub async fn delete_health_log(&self, user_id: &str, log_id: &str) -> Result<(), AppError> {
        let found = self
            .db
            .mark_health_log_deleted(user_id, log_id, Utc::now())
            .await
            .map_err(failed(user_id, "delete health log"))?;

        if !found {
            return Err(AppError::NotFound(format!("Health log {}", log_id)));
        }

        tracing::info!(user_id, log_id, "Health log soft-deleted");
        Ok(())
    }

    /// Today's log in local time, if any.
    pub async fn get_today_log(&self, user_id: &str) -> Result<Option<HealthLog>, AppError> {
        self.get_health_log_by_date(user_id, &format_date(&today()))
            .await
    }
}
