//! nv-session: session-scoped key material and batch field operations
//!
//! A session owns exactly one [`KeyProvider`]:
//! - client path: [`PinKeyProvider`], built when the user enters their
//!   PIN, dropped at logout/PIN-clear (a PIN change builds a new one —
//!   providers are never mutated in place);
//! - server path: [`MasterKeyProvider`], built once at process start
//!   from the environment secret.
//!
//! Batch operations fan out per field, preserve index alignment, and
//! isolate read-path failures behind the fallback sentinel.

pub mod batch;
pub mod pin;
pub mod provider;
pub mod records;

pub use batch::{decrypt_batch, encrypt_batch};
pub use pin::{enroll_pin, generate_user_salt, verify_pin, PinEnrollment};
pub use provider::{KeyProvider, MasterKeyProvider, PinKeyProvider};
pub use records::{decrypt_note, decrypt_notes, decrypt_tags, encrypt_note, encrypt_tag};
