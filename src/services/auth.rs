// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication service.
//!
//! Wraps the identity provider and mirrors a minimal account record into
//! `users/{uid}` for consent tracking. Provider failures are translated to
//! [`AuthErrorKind`] here and nowhere else.

use crate::db::FirestoreDb;
use crate::error::{AppError, AuthErrorKind};
use crate::models::AuthUser;
use crate::services::identity::{AuthSession, IdentityProvider, ProviderError};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Sign-up, sign-in and consent bookkeeping.
#[derive(Clone)]
pub struct AuthService {
    provider: Arc<dyn IdentityProvider>,
    db: FirestoreDb,
    current: Arc<RwLock<Option<AuthSession>>>,
}

fn translate(action: &str, err: ProviderError) -> AppError {
    let kind = AuthErrorKind::from_provider_code(&err.code);
    tracing::error!(code = %err.code, kind = ?kind, "{} failed", action);
    AppError::Auth(kind)
}

impl AuthService {
    pub fn new(provider: Arc<dyn IdentityProvider>, db: FirestoreDb) -> Self {
        Self {
            provider,
            db,
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Register a new account and create its mirrored record.
    ///
    /// Consent flags start out false; the caller records them afterwards
    /// with [`update_consent`](Self::update_consent).
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AppError> {
        let session = self
            .provider
            .create_user(email, password)
            .await
            .map_err(|e| translate("Sign up", e))?;

        let now = Utc::now();
        let account = AuthUser {
            uid: session.uid.clone(),
            email: session.email.clone(),
            email_verified: session.email_verified,
            agreed_to_terms: false,
            data_retention_consent: false,
            created_at: Some(now),
            last_login: Some(now),
            consent_updated_at: None,
        };

        self.db.set_account(&account).await.map_err(|e| {
            tracing::error!(user_id = %account.uid, error = %e, "Failed to create user record");
            e.context("create user record")
        })?;

        tracing::info!(user_id = %account.uid, "User signed up");
        *self.current.write().await = Some(session);
        Ok(account)
    }

    /// Authenticate and stamp the last-login time.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AppError> {
        let session = self
            .provider
            .sign_in(email, password)
            .await
            .map_err(|e| translate("Sign in", e))?;

        self.db
            .touch_last_login(&session.uid, Utc::now())
            .await
            .map_err(|e| {
                tracing::error!(user_id = %session.uid, error = %e, "Failed to update last login");
                e.context("update last login")
            })?;

        tracing::info!(user_id = %session.uid, "User signed in");
        *self.current.write().await = Some(session.clone());
        Ok(session)
    }

    /// End the current session. A no-op when nobody is signed in.
    pub async fn sign_out(&self) -> Result<(), AppError> {
        let mut current = self.current.write().await;
        if let Some(session) = current.as_ref() {
            self.provider.sign_out(session).await.map_err(|e| {
                tracing::error!(user_id = %session.uid, code = %e.code, "Sign out failed");
                AppError::SignOut
            })?;
            tracing::info!(user_id = %session.uid, "User signed out");
        }
        *current = None;
        Ok(())
    }

    /// Send a password-reset email.
    pub async fn reset_password(&self, email: &str) -> Result<(), AppError> {
        self.provider
            .send_password_reset(email)
            .await
            .map_err(|e| translate("Password reset", e))?;
        tracing::info!("Password reset email sent");
        Ok(())
    }

    pub async fn get_current_user(&self) -> Option<AuthSession> {
        self.current.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// The mirrored account record, or `None` if there is none.
    pub async fn get_user_data(&self, uid: &str) -> Result<Option<AuthUser>, AppError> {
        tracing::debug!(user_id = uid, "Fetching user record");
        self.db.get_account(uid).await.map_err(|e| {
            tracing::error!(user_id = uid, error = %e, "Failed to get user data");
            e.context("get user data")
        })
    }

    /// Record consent choices (merge write of both flags plus a timestamp).
    pub async fn update_consent(
        &self,
        uid: &str,
        agreed_to_terms: bool,
        data_retention_consent: bool,
    ) -> Result<(), AppError> {
        self.db
            .update_consent(uid, agreed_to_terms, data_retention_consent, Utc::now())
            .await
            .map_err(|e| {
                tracing::error!(user_id = uid, error = %e, "Failed to update consent");
                e.context("update consent")
            })?;

        tracing::info!(
            user_id = uid,
            agreed_to_terms,
            data_retention_consent,
            "Consent updated"
        );
        Ok(())
    }
}
