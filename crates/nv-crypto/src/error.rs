use thiserror::Error;

/// Failure taxonomy for the field-encryption layer.
///
/// Batch callers recover `DecryptionFailed`/`MalformedEnvelope` into the
/// fallback sentinel; everything else is surfaced to the caller.
#[derive(Debug, Clone, Error)]
pub enum CryptoError {
    /// Required key input (salt, PIN) is missing for this session
    #[error("key unavailable: {0}")]
    KeyUnavailable(String),

    /// Server-side key secret is absent or unusable
    #[error("configuration error: {0}")]
    Configuration(String),

    /// AEAD encryption failed; the plaintext must not be persisted
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    /// AEAD decryption failed: wrong key, corrupted data, or tampering
    #[error("decryption failed: invalid key or corrupted data")]
    DecryptionFailed,

    /// Stored value is not a structurally valid envelope
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(&'static str),
}

impl CryptoError {
    /// True for the decrypt-path failures that the fallback policy
    /// substitutes with a sentinel in list contexts.
    pub fn is_recoverable_read(&self) -> bool {
        matches!(
            self,
            CryptoError::DecryptionFailed | CryptoError::MalformedEnvelope(_)
        )
    }
}
