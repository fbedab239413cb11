// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auth service tests with a fake identity provider.

use health_tracker::error::{AppError, AuthErrorKind};
use std::sync::atomic::Ordering;

mod common;
use common::test_state;

const EMAIL: &str = "ada@example.com";
const PASSWORD: &str = "Passw0rdOk";

#[tokio::test]
async fn test_sign_up_creates_mirrored_record() {
    let (state, _) = test_state();

    let account = state.auth.sign_up(EMAIL, PASSWORD).await.unwrap();
    assert_eq!(account.email, EMAIL);
    assert!(!account.agreed_to_terms);
    assert!(!account.data_retention_consent);
    assert!(account.created_at.is_some());

    let stored = state.auth.get_user_data(&account.uid).await.unwrap().unwrap();
    assert_eq!(stored, account);

    assert!(state.auth.is_authenticated().await);
    let current = state.auth.get_current_user().await.unwrap();
    assert_eq!(current.uid, account.uid);
}

#[tokio::test]
async fn test_duplicate_sign_up_translated() {
    let (state, _) = test_state();
    state.auth.sign_up(EMAIL, PASSWORD).await.unwrap();

    let err = state.auth.sign_up(EMAIL, PASSWORD).await.unwrap_err();
    assert_eq!(err.auth_kind(), Some(AuthErrorKind::EmailAlreadyInUse));
    assert_eq!(err.to_string(), "Email is already registered");
}

#[tokio::test]
async fn test_weak_password_translated() {
    let (state, _) = test_state();
    let err = state.auth.sign_up(EMAIL, "abc").await.unwrap_err();
    assert_eq!(err.auth_kind(), Some(AuthErrorKind::WeakPassword));
}

#[tokio::test]
async fn test_sign_in_stamps_last_login() {
    let (state, _) = test_state();
    let account = state.auth.sign_up(EMAIL, PASSWORD).await.unwrap();
    state.auth.sign_out().await.unwrap();
    assert!(!state.auth.is_authenticated().await);

    let session = state.auth.sign_in(EMAIL, PASSWORD).await.unwrap();
    assert_eq!(session.uid, account.uid);

    let stored = state.auth.get_user_data(&account.uid).await.unwrap().unwrap();
    assert!(stored.last_login.unwrap() >= account.last_login.unwrap());
    // Merge write left the rest alone
    assert_eq!(stored.email, EMAIL);
    assert_eq!(stored.created_at, account.created_at);
}

#[tokio::test]
async fn test_sign_in_errors_translated() {
    let (state, _) = test_state();
    state.auth.sign_up(EMAIL, PASSWORD).await.unwrap();
    state.auth.sign_out().await.unwrap();

    let err = state.auth.sign_in(EMAIL, "WrongPass1").await.unwrap_err();
    assert_eq!(err.auth_kind(), Some(AuthErrorKind::WrongPassword));
    assert_eq!(err.to_string(), "Incorrect password");

    let err = state
        .auth
        .sign_in("nobody@example.com", PASSWORD)
        .await
        .unwrap_err();
    assert_eq!(err.auth_kind(), Some(AuthErrorKind::UserNotFound));

    assert!(!state.auth.is_authenticated().await);
}

#[tokio::test]
async fn test_unmapped_provider_code_is_generic() {
    let (state, identity) = test_state();
    identity.fail_next_with("auth/operation-not-allowed");

    let err = state.auth.sign_up(EMAIL, PASSWORD).await.unwrap_err();
    assert_eq!(err.auth_kind(), Some(AuthErrorKind::Unknown));
    assert_eq!(err.to_string(), "An error occurred. Please try again");
}

#[tokio::test]
async fn test_network_failure_translated() {
    let (state, identity) = test_state();
    identity.fail_next_with("auth/network-request-failed");

    let err = state.auth.sign_in(EMAIL, PASSWORD).await.unwrap_err();
    assert_eq!(err.to_string(), "Network error. Check your connection");
}

#[tokio::test]
async fn test_sign_out_failure() {
    let (state, identity) = test_state();
    state.auth.sign_up(EMAIL, PASSWORD).await.unwrap();
    identity.fail_sign_out.store(true, Ordering::SeqCst);

    let err = state.auth.sign_out().await.unwrap_err();
    assert!(matches!(err, AppError::SignOut));
    assert_eq!(err.to_string(), "Failed to sign out");
    assert!(state.auth.is_authenticated().await);
}

#[tokio::test]
async fn test_sign_out_when_signed_out_is_noop() {
    let (state, _) = test_state();
    state.auth.sign_out().await.unwrap();
    assert!(state.auth.get_current_user().await.is_none());
}

#[tokio::test]
async fn test_reset_password() {
    let (state, identity) = test_state();
    state.auth.sign_up(EMAIL, PASSWORD).await.unwrap();

    state.auth.reset_password(EMAIL).await.unwrap();
    assert_eq!(*identity.reset_emails.lock().unwrap(), vec![EMAIL.to_string()]);

    let err = state
        .auth
        .reset_password("nobody@example.com")
        .await
        .unwrap_err();
    assert_eq!(err.auth_kind(), Some(AuthErrorKind::UserNotFound));
}

#[tokio::test]
async fn test_update_consent_merges() {
    let (state, _) = test_state();
    let account = state.auth.sign_up(EMAIL, PASSWORD).await.unwrap();

    state
        .auth
        .update_consent(&account.uid, true, false)
        .await
        .unwrap();

    let stored = state.auth.get_user_data(&account.uid).await.unwrap().unwrap();
    assert!(stored.agreed_to_terms);
    assert!(!stored.data_retention_consent);
    assert!(stored.consent_updated_at.is_some());
    assert_eq!(stored.email, EMAIL);
}

#[tokio::test]
async fn test_unknown_user_data_is_none() {
    let (state, _) = test_state();
    assert!(state.auth.get_user_data("nobody").await.unwrap().is_none());
}
