// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Goal service tests against the in-memory backend.

use health_tracker::error::AppError;
use health_tracker::models::{GoalType, UserGoalInput};

mod common;
use common::test_state;

#[tokio::test]
async fn test_new_goal_gets_id_and_default_unit() {
    let (state, _) = test_state();

    let input = UserGoalInput::new(GoalType::Steps, 10_000.0, "2025-12-01", "2025-12-31");
    let goal = state.goals.save_goal("u1", &input).await.unwrap();

    assert!(uuid::Uuid::parse_str(&goal.goal_id).is_ok());
    assert_eq!(goal.unit, "steps");
    assert!(goal.active);
    assert!(goal.progress.is_none());

    let stored = state.goals.get_goal("u1", &goal.goal_id).await.unwrap();
    assert_eq!(stored, Some(goal));
}

#[tokio::test]
async fn test_update_keeps_created_at_and_progress() {
    let (state, _) = test_state();

    let input = UserGoalInput::new(GoalType::Water, 2_000.0, "2025-12-01", "2025-12-31");
    let goal = state.goals.save_goal("u1", &input).await.unwrap();
    state
        .goals
        .update_goal_progress("u1", &goal.goal_id, 1_000.0)
        .await
        .unwrap();

    let update = UserGoalInput {
        goal_id: Some(goal.goal_id.clone()),
        target_value: 2_500.0,
        unit: Some("ml".to_string()),
        ..input
    };
    let updated = state.goals.save_goal("u1", &update).await.unwrap();

    assert_eq!(updated.goal_id, goal.goal_id);
    assert_eq!(updated.target_value, 2_500.0);
    assert_eq!(updated.created_at, goal.created_at);
    assert_eq!(updated.progress, Some(50));
    assert!(updated.updated_at >= goal.updated_at);
}

#[tokio::test]
async fn test_inverted_dates_rejected() {
    let (state, _) = test_state();
    let input = UserGoalInput::new(GoalType::Sleep, 8.0, "2025-12-31", "2025-12-01");

    let err = state.goals.save_goal("u1", &input).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_progress_is_capped_percentage() {
    let (state, _) = test_state();
    let input = UserGoalInput::new(GoalType::Steps, 10_000.0, "2025-12-01", "2025-12-31");
    let goal = state.goals.save_goal("u1", &input).await.unwrap();

    let progress = state
        .goals
        .update_goal_progress("u1", &goal.goal_id, 6_660.0)
        .await
        .unwrap();
    assert_eq!(progress, 67);

    let progress = state
        .goals
        .update_goal_progress("u1", &goal.goal_id, 15_000.0)
        .await
        .unwrap();
    assert_eq!(progress, 100);

    let stored = state.goals.get_goal("u1", &goal.goal_id).await.unwrap().unwrap();
    assert_eq!(stored.progress, Some(100));
}

#[tokio::test]
async fn test_progress_on_missing_goal() {
    let (state, _) = test_state();
    let err = state
        .goals
        .update_goal_progress("u1", "missing", 1.0)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_active_goals_sorted_and_filtered() {
    let (state, _) = test_state();

    let later = state
        .goals
        .save_goal(
            "u1",
            &UserGoalInput::new(GoalType::Steps, 10_000.0, "2025-12-10", "2025-12-31"),
        )
        .await
        .unwrap();
    let earlier = state
        .goals
        .save_goal(
            "u1",
            &UserGoalInput::new(GoalType::Water, 2_000.0, "2025-12-01", "2025-12-31"),
        )
        .await
        .unwrap();
    let retired = state
        .goals
        .save_goal(
            "u1",
            &UserGoalInput::new(GoalType::Weight, 65.0, "2025-11-01", "2025-12-31"),
        )
        .await
        .unwrap();

    state
        .goals
        .deactivate_goal("u1", &retired.goal_id)
        .await
        .unwrap();

    let active = state.goals.get_active_goals("u1").await.unwrap();
    let ids: Vec<&str> = active.iter().map(|g| g.goal_id.as_str()).collect();
    assert_eq!(ids, vec![earlier.goal_id.as_str(), later.goal_id.as_str()]);

    let kept = state
        .goals
        .get_goal("u1", &retired.goal_id)
        .await
        .unwrap()
        .unwrap();
    assert!(!kept.active);
}

#[tokio::test]
async fn test_deactivate_missing_goal() {
    let (state, _) = test_state();
    let err = state.goals.deactivate_goal("u1", "missing").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
