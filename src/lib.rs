// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Health Tracker: data and utility layer for a mobile health-tracking app
//!
//! This crate provides profile and daily health-log storage in Firestore,
//! identity and consent tracking, client-side encryption, and the metric
//! formulas and form validation the app is built on.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod time_utils;
pub mod units;
pub mod validation;

use config::Config;
use db::FirestoreDb;
use error::AppError;
use services::{
    AuthService, EncryptionService, FirebaseIdentityClient, GoalService, HealthService,
    IdentityProvider, KeyringStore, MemorySecureStore,
};
use std::sync::Arc;

/// Shared application state. Build once at startup and pass it down.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub health: HealthService,
    pub goals: GoalService,
    pub auth: AuthService,
    pub encryption: EncryptionService,
}

impl AppState {
    /// Connect to Firestore, Firebase Auth and the OS keychain.
    pub async fn connect(config: Config) -> Result<Self, AppError> {
        let db = FirestoreDb::new(&config.gcp_project_id).await?;

        let identity = FirebaseIdentityClient::new(
            config.firebase_api_key.clone(),
            config.auth_emulator_host.as_deref(),
        );
        let store = KeyringStore::new(config.secure_store_service.clone());

        tracing::info!(project = %config.gcp_project_id, "Application state ready");
        Ok(Self::assemble(config, db, Arc::new(identity), Arc::new(store)))
    }

    /// In-memory database and secure store with the given identity provider.
    pub fn in_memory(config: Config, identity: Arc<dyn IdentityProvider>) -> Self {
        Self::assemble(
            config,
            FirestoreDb::new_in_memory(),
            identity,
            Arc::new(MemorySecureStore::new()),
        )
    }

    fn assemble(
        config: Config,
        db: FirestoreDb,
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn services::SecureStore>,
    ) -> Self {
        Self {
            health: HealthService::new(db.clone(), config.recent_logs_limit),
            goals: GoalService::new(db.clone()),
            auth: AuthService::new(identity, db.clone()),
            encryption: EncryptionService::new(store),
            config,
            db,
        }
    }
}
