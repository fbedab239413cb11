// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Accounts (`users/{uid}`, consent tracking)
//! - Profiles (`users/{uid}/profile/main`, merge writes)
//! - Health logs (`users/{uid}/healthLogs/{logId}`, full overwrites)
//! - Goals (`users/{uid}/goals/{goalId}`)
//!
//! Every call is a single request. Errors come back as
//! [`AppError::Database`] carrying the client's message.

use crate::db::collections;
use crate::db::memory::MemoryStore;
use crate::error::AppError;
use crate::models::{AuthUser, HealthLog, UserGoal, UserProfile, UserProfilePatch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Where documents actually live.
#[derive(Clone)]
enum Backend {
    Firestore(firestore::FirestoreDb),
    Memory(Arc<MemoryStore>),
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    backend: Backend,
}

// ─── Merge-write payloads ────────────────────────────────────────
//
// Each is written with `FIELDS` as the update mask.

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LastLoginUpdate {
    uid: String,
    #[serde(with = "firestore::serialize_as_timestamp")]
    last_login: DateTime<Utc>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConsentUpdate {
    uid: String,
    agreed_to_terms: bool,
    data_retention_consent: bool,
    #[serde(with = "firestore::serialize_as_timestamp")]
    consent_updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SoftDeleteUpdate {
    deleted: bool,
    #[serde(with = "firestore::serialize_as_timestamp")]
    deleted_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoalProgressUpdate {
    progress: i64,
    #[serde(with = "firestore::serialize_as_timestamp")]
    updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoalActiveUpdate {
    active: bool,
    #[serde(with = "firestore::serialize_as_timestamp")]
    updated_at: DateTime<Utc>,
}

impl LastLoginUpdate {
    const FIELDS: [&'static str; 2] = ["uid", "lastLogin"];
}

impl ConsentUpdate {
    const FIELDS: [&'static str; 4] = [
        "uid",
        "agreedToTerms",
        "dataRetentionConsent",
        "consentUpdatedAt",
    ];
}

impl SoftDeleteUpdate {
    const FIELDS: [&'static str; 2] = ["deleted", "deletedAt"];
}

impl GoalProgressUpdate {
    const FIELDS: [&'static str; 2] = ["progress", "updatedAt"];
}

impl GoalActiveUpdate {
    const FIELDS: [&'static str; 2] = ["active", "updatedAt"];
}

fn db_error(e: impl std::fmt::Display) -> AppError {
    AppError::Database(e.to_string())
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    /// Create an in-memory database (offline mode and tests).
    pub fn new_in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemoryStore::new())),
        }
    }

    // ─── Account Operations ──────────────────────────────────────

    /// Get a mirrored account record.
    pub async fn get_account(&self, uid: &str) -> Result<Option<AuthUser>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => client
                .fluent()
                .select()
                .by_id_in(collections::USERS)
                .obj()
                .one(uid)
                .await
                .map_err(db_error),
            Backend::Memory(store) => Ok(store.account(uid)),
        }
    }

    /// Create or replace an account record.
    pub async fn set_account(&self, account: &AuthUser) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::USERS)
                    .document_id(&account.uid)
                    .object(account)
                    .execute()
                    .await
                    .map_err(db_error)?;
            }
            Backend::Memory(store) => store.set_account(account),
        }
        Ok(())
    }

    /// Stamp the last sign-in time (merge write).
    pub async fn touch_last_login(&self, uid: &str, at: DateTime<Utc>) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let update = LastLoginUpdate {
                    uid: uid.to_string(),
                    last_login: at,
                };
                let _: () = client
                    .fluent()
                    .update()
                    .fields(LastLoginUpdate::FIELDS)
                    .in_col(collections::USERS)
                    .document_id(uid)
                    .object(&update)
                    .execute()
                    .await
                    .map_err(db_error)?;
            }
            Backend::Memory(store) => store.update_account(uid, |account| {
                account.last_login = Some(at);
            }),
        }
        Ok(())
    }

    /// Record consent choices (merge write).
    pub async fn update_consent(
        &self,
        uid: &str,
        agreed_to_terms: bool,
        data_retention_consent: bool,
        at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let update = ConsentUpdate {
                    uid: uid.to_string(),
                    agreed_to_terms,
                    data_retention_consent,
                    consent_updated_at: at,
                };
                let _: () = client
                    .fluent()
                    .update()
                    .fields(ConsentUpdate::FIELDS)
                    .in_col(collections::USERS)
                    .document_id(uid)
                    .object(&update)
                    .execute()
                    .await
                    .map_err(db_error)?;
            }
            Backend::Memory(store) => store.update_account(uid, |account| {
                account.agreed_to_terms = agreed_to_terms;
                account.data_retention_consent = data_retention_consent;
                account.consent_updated_at = Some(at);
            }),
        }
        Ok(())
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Get a user's profile.
    pub async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let parent = client
                    .parent_path(collections::USERS, uid)
                    .map_err(db_error)?;
                client
                    .fluent()
                    .select()
                    .by_id_in(collections::PROFILE)
                    .parent(&parent)
                    .obj()
                    .one(collections::PROFILE_DOC_ID)
                    .await
                    .map_err(db_error)
            }
            Backend::Memory(store) => Ok(store.profile(uid)),
        }
    }

    /// Merge a partial profile over the stored one, creating it if needed.
    ///
    /// Only the patch's fields plus `uid` and `updatedAt` are written.
    pub async fn merge_profile(
        &self,
        uid: &str,
        patch: &UserProfilePatch,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let mut doc = UserProfile::empty(uid);
                patch.apply_to(&mut doc);
                doc.updated_at = updated_at;

                let mut mask = patch.field_mask();
                mask.extend(["uid", "updatedAt"]);

                let parent = client
                    .parent_path(collections::USERS, uid)
                    .map_err(db_error)?;
                let _: () = client
                    .fluent()
                    .update()
                    .fields(mask)
                    .in_col(collections::PROFILE)
                    .document_id(collections::PROFILE_DOC_ID)
                    .parent(&parent)
                    .object(&doc)
                    .execute()
                    .await
                    .map_err(db_error)?;
            }
            Backend::Memory(store) => store.merge_profile(uid, patch, updated_at),
        }
        Ok(())
    }

    // ─── Health Log Operations ───────────────────────────────────

    /// Get a health log by document ID.
    pub async fn get_health_log(
        &self,
        uid: &str,
        log_id: &str,
    ) -> Result<Option<HealthLog>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let parent = client
                    .parent_path(collections::USERS, uid)
                    .map_err(db_error)?;
                client
                    .fluent()
                    .select()
                    .by_id_in(collections::HEALTH_LOGS)
                    .parent(&parent)
                    .obj()
                    .one(log_id)
                    .await
                    .map_err(db_error)
            }
            Backend::Memory(store) => Ok(store.health_log(uid, log_id)),
        }
    }

    /// Store a health log, replacing any existing document with its ID.
    pub async fn set_health_log(&self, uid: &str, log: &HealthLog) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let parent = client
                    .parent_path(collections::USERS, uid)
                    .map_err(db_error)?;
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::HEALTH_LOGS)
                    .document_id(&log.log_id)
                    .parent(&parent)
                    .object(log)
                    .execute()
                    .await
                    .map_err(db_error)?;
            }
            Backend::Memory(store) => store.set_health_log(uid, log),
        }
        Ok(())
    }

    /// Set the soft-delete flag and timestamp on an existing log (merge write).
    ///
    /// Returns `false` if the log does not exist; nothing is written then.
    pub async fn mark_health_log_deleted(
        &self,
        uid: &str,
        log_id: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                if self.get_health_log(uid, log_id).await?.is_none() {
                    return Ok(false);
                }

                let update = SoftDeleteUpdate {
                    deleted: true,
                    deleted_at: at,
                };
                let parent = client
                    .parent_path(collections::USERS, uid)
                    .map_err(db_error)?;
                let _: () = client
                    .fluent()
                    .update()
                    .fields(SoftDeleteUpdate::FIELDS)
                    .in_col(collections::HEALTH_LOGS)
                    .document_id(log_id)
                    .parent(&parent)
                    .object(&update)
                    .execute()
                    .await
                    .map_err(db_error)?;
                Ok(true)
            }
            Backend::Memory(store) => Ok(store.mark_health_log_deleted(uid, log_id, at)),
        }
    }

    /// Find the log whose `date` field equals `date`.
    pub async fn find_health_log_by_date(
        &self,
        uid: &str,
        date: &str,
    ) -> Result<Option<HealthLog>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let parent = client
                    .parent_path(collections::USERS, uid)
                    .map_err(db_error)?;
                let date = date.to_string();
                let logs: Vec<HealthLog> = client
                    .fluent()
                    .select()
                    .from(collections::HEALTH_LOGS)
                    .parent(&parent)
                    .filter(move |q| q.field("date").eq(date.clone()))
                    .limit(1)
                    .obj()
                    .query()
                    .await
                    .map_err(db_error)?;
                Ok(logs.into_iter().next())
            }
            Backend::Memory(store) => Ok(store.health_log_by_date(uid, date)),
        }
    }

    /// Most recent logs by date, newest first.
    pub async fn recent_health_logs(
        &self,
        uid: &str,
        limit: u32,
    ) -> Result<Vec<HealthLog>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let parent = client
                    .parent_path(collections::USERS, uid)
                    .map_err(db_error)?;
                client
                    .fluent()
                    .select()
                    .from(collections::HEALTH_LOGS)
                    .parent(&parent)
                    .order_by([("date", firestore::FirestoreQueryDirection::Descending)])
                    .limit(limit)
                    .obj()
                    .query()
                    .await
                    .map_err(db_error)
            }
            Backend::Memory(store) => Ok(store.recent_health_logs(uid, limit)),
        }
    }

    /// Logs dated within `[start, end]` (inclusive), newest first.
    pub async fn health_logs_in_range(
        &self,
        uid: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<HealthLog>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let parent = client
                    .parent_path(collections::USERS, uid)
                    .map_err(db_error)?;
                let start = start.to_string();
                let end = end.to_string();
                client
                    .fluent()
                    .select()
                    .from(collections::HEALTH_LOGS)
                    .parent(&parent)
                    .filter(move |q| {
                        q.for_all([
                            q.field("date").greater_than_or_equal(start.clone()),
                            q.field("date").less_than_or_equal(end.clone()),
                        ])
                    })
                    .order_by([("date", firestore::FirestoreQueryDirection::Descending)])
                    .obj()
                    .query()
                    .await
                    .map_err(db_error)
            }
            Backend::Memory(store) => Ok(store.health_logs_in_range(uid, start, end)),
        }
    }

    // ─── Goal Operations ─────────────────────────────────────────

    pub async fn get_goal(&self, uid: &str, goal_id: &str) -> Result<Option<UserGoal>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let parent = client
                    .parent_path(collections::USERS, uid)
                    .map_err(db_error)?;
                client
                    .fluent()
                    .select()
                    .by_id_in(collections::GOALS)
                    .parent(&parent)
                    .obj()
                    .one(goal_id)
                    .await
                    .map_err(db_error)
            }
            Backend::Memory(store) => Ok(store.goal(uid, goal_id)),
        }
    }

    /// Store a goal, replacing any existing document with its ID.
    pub async fn set_goal(&self, uid: &str, goal: &UserGoal) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let parent = client
                    .parent_path(collections::USERS, uid)
                    .map_err(db_error)?;
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::GOALS)
                    .document_id(&goal.goal_id)
                    .parent(&parent)
                    .object(goal)
                    .execute()
                    .await
                    .map_err(db_error)?;
            }
            Backend::Memory(store) => store.set_goal(uid, goal),
        }
        Ok(())
    }

    /// Goals with the active flag set, in no particular order.
    pub async fn active_goals(&self, uid: &str) -> Result<Vec<UserGoal>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let parent = client
                    .parent_path(collections::USERS, uid)
                    .map_err(db_error)?;
                client
                    .fluent()
                    .select()
                    .from(collections::GOALS)
                    .parent(&parent)
                    .filter(|q| q.field("active").eq(true))
                    .obj()
                    .query()
                    .await
                    .map_err(db_error)
            }
            Backend::Memory(store) => Ok(store
                .goals(uid)
                .into_iter()
                .filter(|goal| goal.active)
                .collect()),
        }
    }

    /// Store a progress snapshot on an existing goal (merge write).
    pub async fn update_goal_progress(
        &self,
        uid: &str,
        goal_id: &str,
        progress: i64,
        at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let update = GoalProgressUpdate {
                    progress,
                    updated_at: at,
                };
                let parent = client
                    .parent_path(collections::USERS, uid)
                    .map_err(db_error)?;
                let _: () = client
                    .fluent()
                    .update()
                    .fields(GoalProgressUpdate::FIELDS)
                    .in_col(collections::GOALS)
                    .document_id(goal_id)
                    .parent(&parent)
                    .object(&update)
                    .execute()
                    .await
                    .map_err(db_error)?;
            }
            Backend::Memory(store) => {
                store.update_goal(uid, goal_id, |goal| {
                    goal.progress = Some(progress);
                    goal.updated_at = at;
                });
            }
        }
        Ok(())
    }

    /// Set the active flag on a goal (merge write).
    pub async fn set_goal_active(
        &self,
        uid: &str,
        goal_id: &str,
        active: bool,
        at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let update = GoalActiveUpdate {
                    active,
                    updated_at: at,
                };
                let parent = client
                    .parent_path(collections::USERS, uid)
                    .map_err(db_error)?;
                let _: () = client
                    .fluent()
                    .update()
                    .fields(GoalActiveUpdate::FIELDS)
                    .in_col(collections::GOALS)
                    .document_id(goal_id)
                    .parent(&parent)
                    .object(&update)
                    .execute()
                    .await
                    .map_err(db_error)?;
            }
            Backend::Memory(store) => {
                store.update_goal(uid, goal_id, |goal| {
                    goal.active = active;
                    goal.updated_at = at;
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::DeserializeOwned;

    /// Bounds the Firestore update builder puts on `.object()`.
    fn assert_writable<T: Serialize + DeserializeOwned + Send + Sync>() {}

    fn serialized_keys<T: Serialize>(value: &T) -> Vec<String> {
        let json = serde_json::to_value(value).unwrap();
        let mut keys: Vec<String> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn sorted(fields: &[&str]) -> Vec<String> {
        let mut fields: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
        fields.sort();
        fields
    }

    #[test]
    fn test_merge_payloads_are_writable() {
        assert_writable::<LastLoginUpdate>();
        assert_writable::<ConsentUpdate>();
        assert_writable::<SoftDeleteUpdate>();
        assert_writable::<GoalProgressUpdate>();
        assert_writable::<GoalActiveUpdate>();
    }

    #[test]
    fn test_update_masks_match_serialized_fields() {
        let now = Utc::now();

        let update = LastLoginUpdate {
            uid: "u1".to_string(),
            last_login: now,
        };
        assert_eq!(serialized_keys(&update), sorted(&LastLoginUpdate::FIELDS));

        let update = ConsentUpdate {
            uid: "u1".to_string(),
            agreed_to_terms: true,
            data_retention_consent: false,
            consent_updated_at: now,
        };
        assert_eq!(serialized_keys(&update), sorted(&ConsentUpdate::FIELDS));

        let update = SoftDeleteUpdate {
            deleted: true,
            deleted_at: now,
        };
        assert_eq!(serialized_keys(&update), sorted(&SoftDeleteUpdate::FIELDS));

        let update = GoalProgressUpdate {
            progress: 40,
            updated_at: now,
        };
        assert_eq!(serialized_keys(&update), sorted(&GoalProgressUpdate::FIELDS));

        let update = GoalActiveUpdate {
            active: false,
            updated_at: now,
        };
        assert_eq!(serialized_keys(&update), sorted(&GoalActiveUpdate::FIELDS));
    }
}
