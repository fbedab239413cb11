// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User goals: targets over a date range with a progress snapshot.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::metrics::get_percentage;
use crate::models::{UserGoal, UserGoalInput};
use crate::time_utils::{format_date, parse_date};
use chrono::Utc;
use uuid::Uuid;

#[derive(Clone)]
pub struct GoalService {
    db: FirestoreDb,
}

impl GoalService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Create or replace a goal. New goals get a random ID.
    pub async fn save_goal(
        &self,
        user_id: &str,
        input: &UserGoalInput,
    ) -> Result<UserGoal, AppError> {
        let start_date = format_date(&parse_date(&input.start_date)?);
        let end_date = format_date(&parse_date(&input.end_date)?);
        if start_date > end_date {
            return Err(AppError::BadRequest(
                "Goal end date is before its start date".to_string(),
            ));
        }

        let goal_id = input
            .goal_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let existing = self.db.get_goal(user_id, &goal_id).await.map_err(|e| {
            tracing::error!(user_id, goal_id = %goal_id, error = %e, "Failed to save goal");
            e.context("save goal")
        })?;

        let now = Utc::now();
        let goal = UserGoal {
            goal_id,
            user_id: user_id.to_string(),
            goal_type: input.goal_type,
            target_value: input.target_value,
            unit: input
                .unit
                .clone()
                .unwrap_or_else(|| input.goal_type.default_unit().to_string()),
            start_date,
            end_date,
            active: input.active.unwrap_or(true),
            progress: existing.as_ref().and_then(|g| g.progress),
            created_at: existing.as_ref().map(|g| g.created_at).unwrap_or(now),
            updated_at: now,
        };

        self.db.set_goal(user_id, &goal).await.map_err(|e| {
            tracing::error!(user_id, goal_id = %goal.goal_id, error = %e, "Failed to save goal");
            e.context("save goal")
        })?;

        tracing::info!(user_id, goal_id = %goal.goal_id, goal_type = ?goal.goal_type, "Goal saved");
        Ok(goal)
    }

    pub async fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<Option<UserGoal>, AppError> {
        self.db.get_goal(user_id, goal_id).await.map_err(|e| {
            tracing::error!(user_id, goal_id, error = %e, "Failed to get goal");
            e.context("get goal")
        })
    }

    /// Active goals, earliest start date first.
    pub async fn get_active_goals(&self, user_id: &str) -> Result<Vec<UserGoal>, AppError> {
        let mut goals = self.db.active_goals(user_id).await.map_err(|e| {
            tracing::error!(user_id, error = %e, "Failed to get active goals");
            e.context("get active goals")
        })?;

        // No composite index on (active, startDate); order locally.
        goals.sort_by(|a, b| a.start_date.cmp(&b.start_date));
        Ok(goals)
    }

    /// Store `current` as a percentage of the goal's target and return it.
    pub async fn update_goal_progress(
        &self,
        user_id: &str,
        goal_id: &str,
        current: f64,
    ) -> Result<i64, AppError> {
        let goal = self
            .get_goal(user_id, goal_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Goal {}", goal_id)))?;

        let progress = get_percentage(current, goal.target_value);
        self.db
            .update_goal_progress(user_id, goal_id, progress, Utc::now())
            .await
            .map_err(|e| {
                tracing::error!(user_id, goal_id, error = %e, "Failed to update goal progress");
                e.context("update goal progress")
            })?;

        tracing::debug!(user_id, goal_id, progress, "Goal progress updated");
        Ok(progress)
    }

    /// Clear the active flag. The goal itself is kept.
    pub async fn deactivate_goal(&self, user_id: &str, goal_id: &str) -> Result<(), AppError> {
        if self.get_goal(user_id, goal_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Goal {}", goal_id)));
        }

        self.db
            .set_goal_active(user_id, goal_id, false, Utc::now())
            .await
            .map_err(|e| {
                tracing::error!(user_id, goal_id, error = %e, "Failed to deactivate goal");
                e.context("deactivate goal")
            })?;

        tracing::info!(user_id, goal_id, "Goal deactivated");
        Ok(())
    }
}
