// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.
//!
//! Validation problems are not errors; see [`crate::validation`]. Everything
//! that reaches the database, the identity provider or the secure store
//! comes back as an [`AppError`].

/// Application error type shared by every service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(String),

    /// Identity provider failure, already translated to a stable kind.
    #[error("{}", .0.user_message())]
    Auth(AuthErrorKind),

    #[error("Failed to sign out")]
    SignOut,

    #[error("Encryption key not found")]
    EncryptionKeyMissing,

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("Secure store error: {0}")]
    SecureStore(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Prefix a database failure with the operation that hit it.
    ///
    /// Other variants pass through untouched so that `NotFound` and friends
    /// keep their meaning.
    pub fn context(self, action: &str) -> Self {
        match self {
            AppError::Database(msg) => AppError::Database(format!("Failed to {}: {}", action, msg)),
            other => other,
        }
    }

    /// The translated auth kind, if this is an identity provider failure.
    pub fn auth_kind(&self) -> Option<AuthErrorKind> {
        match self {
            AppError::Auth(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Serialization(e.to_string())
    }
}

/// Result type alias for service calls.
pub type Result<T> = std::result::Result<T, AppError>;

/// Internal enumeration of identity failures.
///
/// Provider-specific codes are translated once, in
/// [`AuthErrorKind::from_provider_code`], so swapping providers does not
/// change what callers match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    EmailAlreadyInUse,
    InvalidEmail,
    WeakPassword,
    UserNotFound,
    WrongPassword,
    TooManyRequests,
    NetworkRequestFailed,
    Unknown,
}

impl AuthErrorKind {
    /// Translate a provider error code.
    ///
    /// Accepts both the Firebase client SDK codes (`auth/weak-password`) and
    /// the Identity Toolkit REST codes (`WEAK_PASSWORD : Password should be
    /// at least 6 characters`).
    pub fn from_provider_code(code: &str) -> Self {
        // REST messages carry a human suffix after " : "
        let code = code.split(" : ").next().unwrap_or(code).trim();

        match code {
            "auth/email-already-in-use" | "EMAIL_EXISTS" => Self::EmailAlreadyInUse,
            "auth/invalid-email" | "INVALID_EMAIL" | "MISSING_EMAIL" => Self::InvalidEmail,
            "auth/weak-password" | "WEAK_PASSWORD" => Self::WeakPassword,
            "auth/user-not-found" | "EMAIL_NOT_FOUND" | "USER_NOT_FOUND" => Self::UserNotFound,
            "auth/wrong-password" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
                Self::WrongPassword
            }
            "auth/too-many-requests" | "TOO_MANY_ATTEMPTS_TRY_LATER" => Self::TooManyRequests,
            "auth/network-request-failed" => Self::NetworkRequestFailed,
            _ => Self::Unknown,
        }
    }

    /// Friendly message shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmailAlreadyInUse => "Email is already registered",
            Self::InvalidEmail => "Invalid email address",
            Self::WeakPassword => "Password is too weak",
            Self::UserNotFound => "No account found with this email",
            Self::WrongPassword => "Incorrect password",
            Self::TooManyRequests => "Too many attempts. Please try again later",
            Self::NetworkRequestFailed => "Network error. Check your connection",
            Self::Unknown => "An error occurred. Please try again",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdk_codes_translate() {
        assert_eq!(
            AuthErrorKind::from_provider_code("auth/email-already-in-use"),
            AuthErrorKind::EmailAlreadyInUse
        );
        assert_eq!(
            AuthErrorKind::from_provider_code("auth/wrong-password"),
            AuthErrorKind::WrongPassword
        );
        assert_eq!(
            AuthErrorKind::from_provider_code("auth/network-request-failed"),
            AuthErrorKind::NetworkRequestFailed
        );
    }

    #[test]
    fn test_rest_codes_translate() {
        assert_eq!(
            AuthErrorKind::from_provider_code("EMAIL_EXISTS"),
            AuthErrorKind::EmailAlreadyInUse
        );
        assert_eq!(
            AuthErrorKind::from_provider_code(
                "WEAK_PASSWORD : Password should be at least 6 characters"
            ),
            AuthErrorKind::WeakPassword
        );
        assert_eq!(
            AuthErrorKind::from_provider_code("EMAIL_NOT_FOUND"),
            AuthErrorKind::UserNotFound
        );
    }

    #[test]
    fn test_unmapped_code_falls_back() {
        let kind = AuthErrorKind::from_provider_code("auth/operation-not-allowed");
        assert_eq!(kind, AuthErrorKind::Unknown);
        assert_eq!(kind.user_message(), "An error occurred. Please try again");
    }

    #[test]
    fn test_auth_error_displays_friendly_message() {
        let err = AppError::Auth(AuthErrorKind::TooManyRequests);
        assert_eq!(err.to_string(), "Too many attempts. Please try again later");
        assert_eq!(err.auth_kind(), Some(AuthErrorKind::TooManyRequests));
    }

    #[test]
    fn test_context_wraps_database_errors_only() {
        let err = AppError::Database("permission denied".to_string()).context("save health log");
        assert_eq!(
            err.to_string(),
            "Database error: Failed to save health log: permission denied"
        );

        let err = AppError::NotFound("log".to_string()).context("delete health log");
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
