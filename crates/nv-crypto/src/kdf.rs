//! Key derivation: PBKDF2-HMAC-SHA256 → 256-bit field key
//!
//! Two provenances share the same KDF:
//! - user key: derived client-side from (user_id, per-user salt, PIN)
//! - master key: derived server-side from a process-environment secret
//!
//! Derivation is deterministic — the same inputs must reproduce the key
//! bit-for-bit, because that key is the only way back into previously
//! written envelopes.

use pbkdf2::pbkdf2_hmac;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use zeroize::Zeroize;

use crate::{KEY_SIZE, PBKDF2_ITERATIONS};

/// Fixed non-secret PBKDF2 salt for the server-side master key.
/// Per-user or per-field salts for this path are a future refinement.
const MASTER_KEY_SALT: &[u8] = b"notevault-master-salt";

/// A 256-bit symmetric field key.
///
/// Held in memory only — never persisted, never logged. Zeroized on drop.
#[derive(Clone)]
pub struct FieldKey {
    bytes: [u8; KEY_SIZE],
}

impl FieldKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for FieldKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Derive the per-user field key from (user_id, salt, PIN).
///
/// The input key material is `user_id || salt`; the PIN feeds the PBKDF2
/// salt parameter. The per-user salt must be provisioned before calling
/// this — callers map its absence to `CryptoError::KeyUnavailable`
/// rather than defaulting it.
pub fn derive_user_key(user_id: &str, salt: &str, pin: &SecretString) -> FieldKey {
    let mut ikm = Vec::with_capacity(user_id.len() + salt.len());
    ikm.extend_from_slice(user_id.as_bytes());
    ikm.extend_from_slice(salt.as_bytes());

    let mut key = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(
        &ikm,
        pin.expose_secret().as_bytes(),
        PBKDF2_ITERATIONS,
        &mut key,
    );
    ikm.zeroize();

    FieldKey::from_bytes(key)
}

/// Derive the server-side master field key from the secret string held
/// in the process environment.
pub fn derive_master_key(secret: &SecretString) -> FieldKey {
    let mut key = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(
        secret.expose_secret().as_bytes(),
        MASTER_KEY_SALT,
        PBKDF2_ITERATIONS,
        &mut key,
    );
    FieldKey::from_bytes(key)
}
