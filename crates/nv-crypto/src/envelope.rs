//! Envelope framing: (IV, ciphertext+tag) ↔ transport-safe base64
//!
//! No cryptography happens here. Decoding failures are structural
//! (`MalformedEnvelope`), so the fallback policy can distinguish "not an
//! envelope at all" from a real decryption failure.

use base64::{engine::general_purpose::STANDARD as B64, Engine};

use crate::error::CryptoError;
use crate::{IV_SIZE, MIN_ENVELOPE_SIZE, TAG_SIZE};

/// One encrypted field: a random per-write IV and the AES-GCM output
/// (ciphertext with the 16-byte tag appended).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub iv: [u8; IV_SIZE],
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Canonical stored form: `base64(iv || ciphertext || tag)`.
    pub fn encode(&self) -> String {
        let mut combined = Vec::with_capacity(IV_SIZE + self.ciphertext.len());
        combined.extend_from_slice(&self.iv);
        combined.extend_from_slice(&self.ciphertext);
        B64.encode(combined)
    }

    /// Parse the canonical combined form.
    ///
    /// Rejects invalid base64 and any payload shorter than
    /// `MIN_ENVELOPE_SIZE` (28 bytes: IV + tag) — such values cannot be
    /// output of our encrypt path and are classified as not-an-envelope.
    pub fn decode(stored: &str) -> Result<Self, CryptoError> {
        let combined = B64
            .decode(stored.trim())
            .map_err(|_| CryptoError::MalformedEnvelope("not valid base64"))?;

        if combined.len() < MIN_ENVELOPE_SIZE {
            return Err(CryptoError::MalformedEnvelope(
                "decoded payload shorter than IV + tag",
            ));
        }

        let (iv_bytes, ciphertext) = combined.split_at(IV_SIZE);
        let mut iv = [0u8; IV_SIZE];
        iv.copy_from_slice(iv_bytes);

        Ok(Envelope {
            iv,
            ciphertext: ciphertext.to_vec(),
        })
    }

    /// Parse the legacy split form (`cipher` and `iv` stored as two
    /// separate base64 fields). Read-path only; nothing emits this shape
    /// anymore.
    pub fn decode_parts(cipher: &str, iv: &str) -> Result<Self, CryptoError> {
        let iv_bytes = B64
            .decode(iv.trim())
            .map_err(|_| CryptoError::MalformedEnvelope("iv is not valid base64"))?;
        if iv_bytes.len() != IV_SIZE {
            return Err(CryptoError::MalformedEnvelope("iv must be 12 bytes"));
        }

        let ciphertext = B64
            .decode(cipher.trim())
            .map_err(|_| CryptoError::MalformedEnvelope("cipher is not valid base64"))?;
        if ciphertext.len() < TAG_SIZE {
            return Err(CryptoError::MalformedEnvelope(
                "cipher shorter than the auth tag",
            ));
        }

        let mut iv = [0u8; IV_SIZE];
        iv.copy_from_slice(&iv_bytes);

        Ok(Envelope { iv, ciphertext })
    }
}
