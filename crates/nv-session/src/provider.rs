//! Key sourcing: PIN-derived session keys and the server master key.
//!
//! Exactly one provider variant is active for a given field — the client
//! path and the server path are alternative deployments, not layers.

use secrecy::{ExposeSecret, SecretString};

use nv_crypto::{derive_master_key, derive_user_key, CryptoError, FieldKey};

/// Source of the symmetric key for field encrypt/decrypt calls.
///
/// Implementations hold key material for their own lifetime; `field_key`
/// hands out a copy that callers drop when the operation finishes. The
/// key itself never appears in logs or storage.
pub trait KeyProvider: Send + Sync {
    fn field_key(&self) -> Result<FieldKey, CryptoError>;
}

/// Client-path provider: key derived from (user_id, per-user salt, PIN).
///
/// Derivation runs once, at construction — i.e. when the user enters
/// their PIN. Logout or PIN-clear drops the provider and the key with it.
pub struct PinKeyProvider {
    key: FieldKey,
}

impl PinKeyProvider {
    /// Derive the session key. The per-user salt is provisioned at
    /// PIN-set time; if it is missing the user record predates PIN
    /// enrollment and there is no key to derive.
    pub fn new(
        user_id: &str,
        user_salt: Option<&str>,
        pin: &SecretString,
    ) -> Result<Self, CryptoError> {
        let salt = match user_salt {
            Some(s) if !s.is_empty() => s,
            _ => {
                return Err(CryptoError::KeyUnavailable(
                    "user salt is not provisioned".into(),
                ))
            }
        };
        if pin.expose_secret().is_empty() {
            return Err(CryptoError::KeyUnavailable("PIN has not been entered".into()));
        }

        Ok(Self {
            key: derive_user_key(user_id, salt, pin),
        })
    }
}

impl KeyProvider for PinKeyProvider {
    fn field_key(&self) -> Result<FieldKey, CryptoError> {
        Ok(self.key.clone())
    }
}

/// Server-path provider: key derived from a process-environment secret.
pub struct MasterKeyProvider {
    key: FieldKey,
}

impl MasterKeyProvider {
    /// Default environment variable holding the master key secret.
    pub const KEY_ENV: &'static str = "NOTEVAULT_MASTER_KEY";

    /// Read the secret from `var` and derive the master key.
    ///
    /// A missing or empty secret is a hard configuration error — deriving
    /// from a default would mint a guessable key and silently write data
    /// nothing can decrypt later.
    pub fn from_env_var(var: &str) -> Result<Self, CryptoError> {
        match std::env::var(var) {
            Ok(secret) if !secret.is_empty() => {
                Ok(Self::from_secret(&SecretString::from(secret)))
            }
            _ => Err(CryptoError::Configuration(format!(
                "master key environment variable {var} is not set"
            ))),
        }
    }

    pub fn from_env() -> Result<Self, CryptoError> {
        Self::from_env_var(Self::KEY_ENV)
    }

    pub fn from_secret(secret: &SecretString) -> Self {
        Self {
            key: derive_master_key(secret),
        }
    }
}

impl KeyProvider for MasterKeyProvider {
    fn field_key(&self) -> Result<FieldKey, CryptoError> {
        Ok(self.key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nv_crypto::{decrypt_field, encrypt_field};

    #[test]
    fn test_pin_provider_requires_salt() {
        let pin = SecretString::from("123456");

        let result = PinKeyProvider::new("u1", None, &pin);
        assert!(matches!(result, Err(CryptoError::KeyUnavailable(_))));

        let result = PinKeyProvider::new("u1", Some(""), &pin);
        assert!(matches!(result, Err(CryptoError::KeyUnavailable(_))));
    }

    #[test]
    fn test_pin_provider_requires_pin() {
        let result = PinKeyProvider::new("u1", Some("abc-salt"), &SecretString::from(""));
        assert!(matches!(result, Err(CryptoError::KeyUnavailable(_))));
    }

    #[test]
    fn test_two_providers_same_inputs_interchangeable() {
        let pin = SecretString::from("123456");
        let p1 = PinKeyProvider::new("u1", Some("abc-salt"), &pin).unwrap();
        let p2 = PinKeyProvider::new("u1", Some("abc-salt"), &pin).unwrap();

        let stored = encrypt_field("hello", &p1.field_key().unwrap()).unwrap();
        let plaintext = decrypt_field(&stored, &p2.field_key().unwrap()).unwrap();
        assert_eq!(plaintext, "hello");
    }

    #[test]
    fn test_master_provider_missing_env_is_configuration_error() {
        let result = MasterKeyProvider::from_env_var("NOTEVAULT_TEST_UNSET_KEY");
        assert!(matches!(result, Err(CryptoError::Configuration(_))));
    }

    #[test]
    fn test_master_provider_from_secret_roundtrips() {
        let provider = MasterKeyProvider::from_secret(&SecretString::from("server-secret"));
        let key = provider.field_key().unwrap();

        let stored = encrypt_field("note body", &key).unwrap();
        assert_eq!(decrypt_field(&stored, &key).unwrap(), "note body");
    }

    #[test]
    fn test_pin_and_master_keys_differ() {
        let pin_key = PinKeyProvider::new("u1", Some("abc-salt"), &SecretString::from("123456"))
            .unwrap()
            .field_key()
            .unwrap();
        let master_key = MasterKeyProvider::from_secret(&SecretString::from("123456"))
            .field_key()
            .unwrap();

        assert_ne!(pin_key.as_bytes(), master_key.as_bytes());
    }
}
