// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory document store with Firestore's write semantics.
//!
//! Used for offline mode and tests. Mirrors the `users/{uid}/...` layout:
//! a user's sub-documents can exist without the account document, full
//! writes replace, merge writes touch only the named fields.

use crate::models::{AuthUser, HealthLog, UserGoal, UserProfile, UserProfilePatch};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::BTreeMap;

/// Everything stored under one `users/{uid}` document.
#[derive(Debug, Clone, Default)]
struct UserDocuments {
    account: Option<AuthUser>,
    profile: Option<UserProfile>,
    /// Keyed by document ID; BTreeMap keeps document-name order.
    health_logs: BTreeMap<String, HealthLog>,
    goals: BTreeMap<String, UserGoal>,
}

/// Process-local document store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<String, UserDocuments>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Accounts ────────────────────────────────────────────────

    pub fn account(&self, uid: &str) -> Option<AuthUser> {
        self.users.get(uid).and_then(|docs| docs.account.clone())
    }

    pub fn set_account(&self, account: &AuthUser) {
        self.users.entry(account.uid.clone()).or_default().account = Some(account.clone());
    }

    /// Merge-update an account, creating a stub when absent (as Firestore does).
    pub fn update_account(&self, uid: &str, update: impl FnOnce(&mut AuthUser)) {
        let mut docs = self.users.entry(uid.to_string()).or_default();
        let account = docs.account.get_or_insert_with(|| AuthUser {
            uid: uid.to_string(),
            email: String::new(),
            email_verified: false,
            agreed_to_terms: false,
            data_retention_consent: false,
            created_at: None,
            last_login: None,
            consent_updated_at: None,
        });
        update(account);
    }

    // ─── Profiles ────────────────────────────────────────────────

    pub fn profile(&self, uid: &str) -> Option<UserProfile> {
        self.users.get(uid).and_then(|docs| docs.profile.clone())
    }

    pub fn merge_profile(&self, uid: &str, patch: &UserProfilePatch, updated_at: DateTime<Utc>) {
        let mut docs = self.users.entry(uid.to_string()).or_default();
        let profile = docs.profile.get_or_insert_with(|| UserProfile::empty(uid));
        patch.apply_to(profile);
        profile.uid = uid.to_string();
        profile.updated_at = updated_at;
    }

    // ─── Health Logs ─────────────────────────────────────────────

    pub fn health_log(&self, uid: &str, log_id: &str) -> Option<HealthLog> {
        self.users
            .get(uid)
            .and_then(|docs| docs.health_logs.get(log_id).cloned())
    }

    pub fn set_health_log(&self, uid: &str, log: &HealthLog) {
        self.users
            .entry(uid.to_string())
            .or_default()
            .health_logs
            .insert(log.log_id.clone(), log.clone());
    }

    /// Merge the soft-delete flag onto an existing log.
    ///
    /// Returns `false` when there is no such log.
    pub fn mark_health_log_deleted(&self, uid: &str, log_id: &str, at: DateTime<Utc>) -> bool {
        let Some(mut docs) = self.users.get_mut(uid) else {
            return false;
        };
        match docs.health_logs.get_mut(log_id) {
            Some(log) => {
                log.deleted = true;
                log.deleted_at = Some(at);
                true
            }
            None => false,
        }
    }

    /// First log (in document order) whose date equals `date`.
    pub fn health_log_by_date(&self, uid: &str, date: &str) -> Option<HealthLog> {
        self.users.get(uid).and_then(|docs| {
            docs.health_logs
                .values()
                .find(|log| log.date == date)
                .cloned()
        })
    }

    /// Logs ordered by date, newest first.
    pub fn recent_health_logs(&self, uid: &str, limit: u32) -> Vec<HealthLog> {
        let mut logs = self.filtered_logs(uid, |_| true);
        logs.truncate(limit as usize);
        logs
    }

    /// Logs with `start <= date <= end`, newest first.
    pub fn health_logs_in_range(&self, uid: &str, start: &str, end: &str) -> Vec<HealthLog> {
        self.filtered_logs(uid, |log| log.date.as_str() >= start && log.date.as_str() <= end)
    }

    fn filtered_logs(&self, uid: &str, keep: impl Fn(&HealthLog) -> bool) -> Vec<HealthLog> {
        let mut logs: Vec<HealthLog> = self
            .users
            .get(uid)
            .map(|docs| {
                docs.health_logs
                    .values()
                    .filter(|log| keep(log))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        logs.sort_by(|a, b| b.date.cmp(&a.date));
        logs
    }

    // ─── Goals ───────────────────────────────────────────────────

    pub fn goal(&self, uid: &str, goal_id: &str) -> Option<UserGoal> {
        self.users
            .get(uid)
            .and_then(|docs| docs.goals.get(goal_id).cloned())
    }

    pub fn set_goal(&self, uid: &str, goal: &UserGoal) {
        self.users
            .entry(uid.to_string())
            .or_default()
            .goals
            .insert(goal.goal_id.clone(), goal.clone());
    }

    pub fn goals(&self, uid: &str) -> Vec<UserGoal> {
        self.users
            .get(uid)
            .map(|docs| docs.goals.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Apply a merge update to an existing goal. Returns `false` if absent.
    pub fn update_goal(&self, uid: &str, goal_id: &str, update: impl FnOnce(&mut UserGoal)) -> bool {
        let Some(mut docs) = self.users.get_mut(uid) else {
            return false;
        };
        match docs.goals.get_mut(goal_id) {
            Some(goal) => {
                update(goal);
                true
            }
            None => false,
        }
    }
}
