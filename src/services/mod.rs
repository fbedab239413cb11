// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth;
pub mod encryption;
pub mod goals;
pub mod health;
pub mod identity;

pub use auth::AuthService;
pub use encryption::{
    EncryptionService, KeyringStore, MemorySecureStore, SecureStore, ENCRYPTION_KEY_NAME,
};
pub use goals::GoalService;
pub use health::HealthService;
pub use identity::{AuthSession, FirebaseIdentityClient, IdentityProvider, ProviderError};
