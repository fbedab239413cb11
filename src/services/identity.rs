// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider abstraction and the Firebase Auth REST client.
//!
//! Calls used:
//! - `accounts:signUp` (email/password registration)
//! - `accounts:signInWithPassword`
//! - `accounts:lookup` (email verification flag)
//! - `accounts:sendOobCode` with `PASSWORD_RESET`
//!
//! Failures carry the provider's raw code in [`ProviderError`]; the auth
//! service translates it to an [`AuthErrorKind`](crate::error::AuthErrorKind).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Code reported when the provider could not be reached at all.
pub const NETWORK_REQUEST_FAILED: &str = "auth/network-request-failed";

/// A signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub uid: String,
    pub email: String,
    pub email_verified: bool,
    pub id_token: String,
    pub refresh_token: String,
}

/// Raw provider failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}")]
pub struct ProviderError {
    /// Provider error code (`EMAIL_EXISTS`, `auth/network-request-failed`, ...)
    pub code: String,
}

impl ProviderError {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

/// Email/password identity operations.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn create_user(&self, email: &str, password: &str) -> Result<AuthSession, ProviderError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, ProviderError>;

    /// End a session. Providers without server-side sessions just succeed.
    async fn sign_out(&self, session: &AuthSession) -> Result<(), ProviderError>;

    async fn send_password_reset(&self, email: &str) -> Result<(), ProviderError>;
}

// ─── Firebase REST client ────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OobCodeRequest<'a> {
    request_type: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    id_token: String,
    #[serde(default)]
    refresh_token: String,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    #[serde(default)]
    email_verified: bool,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Extract the provider code from an Identity Toolkit error body.
///
/// Bodies look like `{"error": {"code": 400, "message": "EMAIL_EXISTS"}}`.
fn parse_error_body(body: &str) -> ProviderError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => ProviderError::new(envelope.error.message),
        Err(_) => ProviderError::new("UNKNOWN"),
    }
}

/// Firebase Auth via the Identity Toolkit REST API.
#[derive(Clone)]
pub struct FirebaseIdentityClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FirebaseIdentityClient {
    /// Create a client. `emulator_host` (host:port) points it at the Auth emulator.
    pub fn new(api_key: String, emulator_host: Option<&str>) -> Self {
        let base_url = match emulator_host {
            Some(host) => {
                tracing::info!(host, "Using Firebase Auth emulator");
                format!("http://{}/identitytoolkit.googleapis.com/v1", host)
            }
            None => IDENTITY_TOOLKIT_URL.to_string(),
        };

        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// POST a JSON body to `accounts:{method}` and decode the reply.
    async fn post<B, T>(&self, method: &str, body: &B) -> Result<T, ProviderError>
    where
        B: Serialize + Sync,
        T: for<'de> Deserialize<'de> + Send,
    {
        let url = format!("{}/accounts:{}", self.base_url, method);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(method, error = %e, "Identity request failed");
                ProviderError::new(NETWORK_REQUEST_FAILED)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let err = parse_error_body(&body);
            tracing::debug!(method, status = %status, code = %err.code, "Identity call rejected");
            return Err(err);
        }

        response.json().await.map_err(|e| {
            tracing::warn!(method, error = %e, "Unreadable identity response");
            ProviderError::new("UNKNOWN")
        })
    }

    async fn email_verified(&self, id_token: &str) -> Result<bool, ProviderError> {
        let lookup: LookupResponse = self.post("lookup", &LookupRequest { id_token }).await?;
        Ok(lookup.users.first().is_some_and(|u| u.email_verified))
    }

    async fn password_call(
        &self,
        method: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, ProviderError> {
        let request = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let token: TokenResponse = self.post(method, &request).await?;
        let email_verified = self.email_verified(&token.id_token).await?;

        Ok(AuthSession {
            uid: token.local_id,
            email: if token.email.is_empty() {
                email.to_string()
            } else {
                token.email
            },
            email_verified,
            id_token: token.id_token,
            refresh_token: token.refresh_token,
        })
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityClient {
    async fn create_user(&self, email: &str, password: &str) -> Result<AuthSession, ProviderError> {
        self.password_call("signUp", email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, ProviderError> {
        self.password_call("signInWithPassword", email, password)
            .await
    }

    async fn sign_out(&self, _session: &AuthSession) -> Result<(), ProviderError> {
        // ID tokens are stateless; dropping them locally is the sign-out.
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), ProviderError> {
        let request = OobCodeRequest {
            request_type: "PASSWORD_RESET",
            email,
        };
        let _: serde_json::Value = self.post("sendOobCode", &request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_body() {
        let body = r#"{"error":{"code":400,"message":"EMAIL_EXISTS","errors":[]}}"#;
        assert_eq!(parse_error_body(body).code, "EMAIL_EXISTS");
    }

    #[test]
    fn test_parse_error_body_keeps_detail_suffix() {
        let body = r#"{"error":{"code":400,"message":"WEAK_PASSWORD : Password should be at least 6 characters"}}"#;
        assert!(parse_error_body(body).code.starts_with("WEAK_PASSWORD"));
    }

    #[test]
    fn test_parse_error_body_garbage() {
        assert_eq!(parse_error_body("<html>502</html>").code, "UNKNOWN");
    }

    #[test]
    fn test_emulator_base_url() {
        let client = FirebaseIdentityClient::new("k".to_string(), Some("localhost:9099"));
        assert_eq!(
            client.base_url,
            "http://localhost:9099/identitytoolkit.googleapis.com/v1"
        );

        let client = FirebaseIdentityClient::new("k".to_string(), None);
        assert_eq!(client.base_url, IDENTITY_TOOLKIT_URL);
    }
}
