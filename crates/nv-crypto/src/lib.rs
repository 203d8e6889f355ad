//! nv-crypto: per-field envelope encryption for notevault
//!
//! Stored envelope format (one encrypted field = one base64 string):
//! ```text
//! base64( [12 bytes: random IV][N bytes: ciphertext][16 bytes: GCM tag] )
//! ```
//! A legacy deployment stored the same bytes as two separate base64
//! fields (`cipher`, `iv`); the codec still reads that shape but never
//! writes it.
//!
//! Key derivation (both paths PBKDF2-HMAC-SHA256, 100,000 iterations):
//! ```text
//! user key   = PBKDF2(ikm = user_id || salt, salt = PIN)    — client path
//! master key = PBKDF2(ikm = server secret, salt = fixed)    — server path
//! ```
//! The iteration count, IV length, and tag length are pinned: existing
//! stored envelopes must stay decryptable across versions.

pub mod cipher;
pub mod classify;
pub mod envelope;
pub mod error;
pub mod kdf;

pub use cipher::{decrypt_field, decrypt_field_parts, encrypt_field};
pub use classify::{looks_encrypted, DECRYPT_SENTINEL};
pub use envelope::Envelope;
pub use error::CryptoError;
pub use kdf::{derive_master_key, derive_user_key, FieldKey};

/// Size of a field key in bytes (256-bit AES)
pub const KEY_SIZE: usize = 32;

/// Size of an AES-GCM IV (96-bit)
pub const IV_SIZE: usize = 12;

/// Size of a GCM authentication tag
pub const TAG_SIZE: usize = 16;

/// Smallest decodable envelope: IV plus the tag of an empty ciphertext
pub const MIN_ENVELOPE_SIZE: usize = IV_SIZE + TAG_SIZE;

/// PBKDF2 iteration count (fixed for compatibility with stored data)
pub const PBKDF2_ITERATIONS: u32 = 100_000;
