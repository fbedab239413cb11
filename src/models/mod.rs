// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod goal;
pub mod health_log;
pub mod profile;
pub mod user;

pub use goal::{GoalType, UserGoal, UserGoalInput};
pub use health_log::{DataSource, HealthLog, HealthLogInput};
pub use profile::{Gender, UserProfile, UserProfilePatch};
pub use user::AuthUser;
