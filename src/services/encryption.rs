// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side encryption with a device-held key.
//!
//! A single 256-bit key lives in the platform secure store under
//! [`ENCRYPTION_KEY_NAME`]. It is created on first use and never rotated.
//! Ciphertexts are AES-256-GCM, encoded as base64 of `nonce || ct || tag`.

use crate::error::AppError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use dashmap::DashMap;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Name of the secure-store slot holding the hex-encoded key.
pub const ENCRYPTION_KEY_NAME: &str = "health_app_encryption_key";

const KEY_LEN: usize = 32;

/// Named string slots in a secure key-value store.
pub trait SecureStore: Send + Sync {
    fn get(&self, name: &str) -> Result<Option<String>, AppError>;
    fn set(&self, name: &str, value: &str) -> Result<(), AppError>;
    fn delete(&self, name: &str) -> Result<(), AppError>;
}

/// OS keychain (Keychain, Secret Service, Credential Manager).
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, name: &str) -> Result<keyring::Entry, AppError> {
        keyring::Entry::new(&self.service, name).map_err(|e| AppError::SecureStore(e.to_string()))
    }
}

impl SecureStore for KeyringStore {
    fn get(&self, name: &str) -> Result<Option<String>, AppError> {
        match self.entry(name)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(AppError::SecureStore(e.to_string())),
        }
    }

    fn set(&self, name: &str, value: &str) -> Result<(), AppError> {
        self.entry(name)?
            .set_password(value)
            .map_err(|e| AppError::SecureStore(e.to_string()))
    }

    fn delete(&self, name: &str) -> Result<(), AppError> {
        match self.entry(name)?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(AppError::SecureStore(e.to_string())),
        }
    }
}

/// Process-local store for tests and offline mode.
#[derive(Default)]
pub struct MemorySecureStore {
    slots: DashMap<String, String>,
}

impl MemorySecureStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecureStore for MemorySecureStore {
    fn get(&self, name: &str) -> Result<Option<String>, AppError> {
        Ok(self.slots.get(name).map(|v| v.value().clone()))
    }

    fn set(&self, name: &str, value: &str) -> Result<(), AppError> {
        self.slots.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<(), AppError> {
        self.slots.remove(name);
        Ok(())
    }
}

/// Encrypts values with the device key.
#[derive(Clone)]
pub struct EncryptionService {
    store: Arc<dyn SecureStore>,
    rng: SystemRandom,
}

impl EncryptionService {
    pub fn new(store: Arc<dyn SecureStore>) -> Self {
        Self {
            store,
            rng: SystemRandom::new(),
        }
    }

    /// Return the stored key, creating and storing one if none exists yet.
    pub fn generate_encryption_key(&self) -> Result<String, AppError> {
        if let Some(existing) = self.store.get(ENCRYPTION_KEY_NAME)? {
            return Ok(existing);
        }

        let mut key = [0u8; KEY_LEN];
        self.rng
            .fill(&mut key)
            .map_err(|e| AppError::Encryption(format!("Failed to generate key: {}", e)))?;
        let encoded = hex::encode(key);

        self.store.set(ENCRYPTION_KEY_NAME, &encoded)?;
        tracing::info!("Generated new encryption key");
        Ok(encoded)
    }

    /// The stored key, if one has been generated.
    pub fn get_encryption_key(&self) -> Result<Option<String>, AppError> {
        self.store.get(ENCRYPTION_KEY_NAME)
    }

    /// Encrypt a string. Fails with `EncryptionKeyMissing` before key generation.
    pub fn encrypt_data(&self, plaintext: &str) -> Result<String, AppError> {
        let key = self.load_key()?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|e| AppError::Encryption(format!("Failed to generate nonce: {}", e)))?;
        let nonce = Nonce::assume_unique_for_key(nonce_bytes);

        let mut in_out = plaintext.as_bytes().to_vec();
        key.seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
            .map_err(|e| AppError::Encryption(format!("Encryption failed: {}", e)))?;

        let mut combined = Vec::with_capacity(NONCE_LEN + in_out.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&in_out);
        Ok(BASE64.encode(combined))
    }

    /// Decrypt a string produced by [`encrypt_data`](Self::encrypt_data).
    pub fn decrypt_data(&self, ciphertext: &str) -> Result<String, AppError> {
        let key = self.load_key()?;

        let combined = BASE64
            .decode(ciphertext)
            .map_err(|e| AppError::Encryption(format!("Invalid ciphertext encoding: {}", e)))?;
        if combined.len() < NONCE_LEN {
            return Err(AppError::Encryption("Ciphertext too short".to_string()));
        }

        let (nonce_bytes, sealed) = combined.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|e| AppError::Encryption(format!("Invalid nonce: {}", e)))?;

        let mut in_out = sealed.to_vec();
        let plaintext = key
            .open_in_place(nonce, Aad::empty(), &mut in_out)
            .map_err(|e| AppError::Encryption(format!("Decryption failed: {}", e)))?;

        String::from_utf8(plaintext.to_vec())
            .map_err(|e| AppError::Encryption(format!("Decrypted data is not UTF-8: {}", e)))
    }

    /// Serialize to JSON, then encrypt.
    pub fn encrypt_object<T: Serialize>(&self, value: &T) -> Result<String, AppError> {
        let json = serde_json::to_string(value)?;
        self.encrypt_data(&json)
    }

    /// Decrypt, then parse the JSON.
    pub fn decrypt_object<T: DeserializeOwned>(&self, ciphertext: &str) -> Result<T, AppError> {
        let json = self.decrypt_data(ciphertext)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn load_key(&self) -> Result<LessSafeKey, AppError> {
        let encoded = self
            .store
            .get(ENCRYPTION_KEY_NAME)?
            .ok_or(AppError::EncryptionKeyMissing)?;
        let bytes = hex::decode(encoded.trim())
            .map_err(|e| AppError::Encryption(format!("Stored key is not hex: {}", e)))?;
        let unbound = UnboundKey::new(&AES_256_GCM, &bytes)
            .map_err(|_| AppError::Encryption(format!("Stored key must be {} bytes", KEY_LEN)))?;
        Ok(LessSafeKey::new(unbound))
    }
}
