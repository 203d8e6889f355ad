//! PIN enrollment: salt provisioning and the entry-gate hash.
//!
//! The PIN hash gates access to the notes UI; it is not key material.
//! The real secret is the PBKDF2-derived field key, which never leaves
//! the session.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use nv_core::types::UserKeyMeta;

/// Result of enrolling a PIN: what gets written to the user record.
#[derive(Debug, Clone)]
pub struct PinEnrollment {
    pub user_salt: String,
    pub pin_hash: String,
}

/// Generate the per-user salt, created once at first PIN-set and never
/// rotated afterwards.
pub fn generate_user_salt() -> String {
    Uuid::new_v4().to_string()
}

/// Enroll a PIN. A salt already on the user record is kept — the salt is
/// minted exactly once, on first enrollment.
pub fn enroll_pin(pin: &SecretString, existing_salt: Option<String>) -> PinEnrollment {
    let user_salt = existing_salt
        .filter(|s| !s.is_empty())
        .unwrap_or_else(generate_user_salt);

    PinEnrollment {
        user_salt,
        pin_hash: hash_pin(pin),
    }
}

/// Check an entered PIN against the stored enrollment.
pub fn verify_pin(pin: &SecretString, meta: &UserKeyMeta) -> bool {
    match &meta.pin_hash {
        Some(stored) => &hash_pin(pin) == stored,
        None => false,
    }
}

fn hash_pin(pin: &SecretString) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pin.expose_secret().as_bytes());
    hex::encode(hasher.finalize())
}

impl PinEnrollment {
    /// The user-record fields this enrollment persists.
    pub fn into_meta(self) -> UserKeyMeta {
        UserKeyMeta {
            pin_set: true,
            user_salt: Some(self.user_salt),
            pin_hash: Some(self.pin_hash),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enroll_generates_salt() {
        let enrollment = enroll_pin(&SecretString::from("123456"), None);

        assert!(!enrollment.user_salt.is_empty());
        assert_eq!(enrollment.pin_hash.len(), 64);
    }

    #[test]
    fn test_enroll_keeps_existing_salt() {
        let enrollment = enroll_pin(&SecretString::from("123456"), Some("abc-salt".into()));
        assert_eq!(enrollment.user_salt, "abc-salt");
    }

    #[test]
    fn test_salts_are_unique() {
        assert_ne!(generate_user_salt(), generate_user_salt());
    }

    #[test]
    fn test_verify_roundtrip() {
        let pin = SecretString::from("123456");
        let meta = enroll_pin(&pin, None).into_meta();

        assert!(meta.pin_set);
        assert!(verify_pin(&pin, &meta));
        assert!(!verify_pin(&SecretString::from("654321"), &meta));
    }

    #[test]
    fn test_verify_fails_without_enrollment() {
        let meta = UserKeyMeta::default();
        assert!(!verify_pin(&SecretString::from("123456"), &meta));
    }
}
