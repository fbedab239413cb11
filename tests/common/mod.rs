// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use dashmap::DashMap;
use health_tracker::config::Config;
use health_tracker::db::FirestoreDb;
use health_tracker::services::{AuthSession, IdentityProvider, ProviderError};
use health_tracker::AppState;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Unique user ID for test isolation against a shared emulator.
#[allow(dead_code)]
pub fn unique_user_id() -> String {
    format!("test-{}", uuid::Uuid::new_v4())
}

/// Identity provider that keeps accounts in memory.
#[derive(Default)]
pub struct FakeIdentity {
    /// email -> (uid, password)
    accounts: DashMap<String, (String, String)>,
    next_uid: AtomicU32,
    /// Error code returned by the next call, if set.
    fail_next: Mutex<Option<String>>,
    pub fail_sign_out: AtomicBool,
    pub reset_emails: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FakeIdentity {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make the next provider call fail with `code`.
    pub fn fail_next_with(&self, code: &str) {
        *self.fail_next.lock().unwrap() = Some(code.to_string());
    }

    fn take_failure(&self) -> Result<(), ProviderError> {
        match self.fail_next.lock().unwrap().take() {
            Some(code) => Err(ProviderError::new(code)),
            None => Ok(()),
        }
    }

    fn session(uid: &str, email: &str) -> AuthSession {
        AuthSession {
            uid: uid.to_string(),
            email: email.to_string(),
            email_verified: false,
            id_token: format!("token-{}", uid),
            refresh_token: format!("refresh-{}", uid),
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn create_user(&self, email: &str, password: &str) -> Result<AuthSession, ProviderError> {
        self.take_failure()?;
        if self.accounts.contains_key(email) {
            return Err(ProviderError::new("EMAIL_EXISTS"));
        }
        if password.len() < 6 {
            return Err(ProviderError::new(
                "WEAK_PASSWORD : Password should be at least 6 characters",
            ));
        }

        let uid = format!("uid-{}", self.next_uid.fetch_add(1, Ordering::SeqCst));
        self.accounts
            .insert(email.to_string(), (uid.clone(), password.to_string()));
        Ok(Self::session(&uid, email))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, ProviderError> {
        self.take_failure()?;
        let account = self
            .accounts
            .get(email)
            .ok_or_else(|| ProviderError::new("EMAIL_NOT_FOUND"))?;
        let (uid, stored) = account.value();
        if stored != password {
            return Err(ProviderError::new("INVALID_PASSWORD"));
        }
        Ok(Self::session(uid, email))
    }

    async fn sign_out(&self, _session: &AuthSession) -> Result<(), ProviderError> {
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(ProviderError::new("auth/internal-error"));
        }
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), ProviderError> {
        self.take_failure()?;
        if !self.accounts.contains_key(email) {
            return Err(ProviderError::new("EMAIL_NOT_FOUND"));
        }
        self.reset_emails.lock().unwrap().push(email.to_string());
        Ok(())
    }
}

/// App state backed by the in-memory database and secure store.
#[allow(dead_code)]
pub fn test_state() -> (AppState, Arc<FakeIdentity>) {
    let identity = FakeIdentity::new();
    let state = AppState::in_memory(Config::default(), identity.clone());
    (state, identity)
}
