//! Batch coordinator: ordered, isolated fan-out over many fields.
//!
//! Items are independent — no shared mutable state, no cross-item
//! ordering — so each one runs as its own task. Join handles are awaited
//! in input order, which keeps output index i aligned with input index i
//! no matter how the scheduler interleaves completion.

use tracing::{debug, warn};

use nv_crypto::{decrypt_field, encrypt_field, CryptoError, DECRYPT_SENTINEL};

use crate::provider::KeyProvider;

/// Encrypt an ordered sequence of fields.
///
/// Fails closed: any item failure (or an unavailable key) aborts the
/// whole batch, because a partial result would tempt the caller into
/// persisting plaintext alongside ciphertext.
pub async fn encrypt_batch(
    items: &[String],
    provider: &dyn KeyProvider,
) -> Result<Vec<String>, CryptoError> {
    let key = provider.field_key()?;

    let handles: Vec<_> = items
        .iter()
        .map(|item| {
            let key = key.clone();
            let item = item.clone();
            tokio::spawn(async move { encrypt_field(&item, &key) })
        })
        .collect();

    let mut out = Vec::with_capacity(handles.len());
    for joined in futures::future::join_all(handles).await {
        let stored = joined
            .map_err(|e| CryptoError::EncryptionFailed(format!("encrypt task failed: {e}")))??;
        out.push(stored);
    }
    Ok(out)
}

/// Decrypt an ordered sequence of stored fields.
///
/// Never fails: each item is decrypted independently and a failed item
/// degrades to [`DECRYPT_SENTINEL`] at its original position, so one bad
/// record cannot take down a whole list view. Blank values pass through
/// unchanged even when the key itself is unavailable.
pub async fn decrypt_batch(items: &[String], provider: &dyn KeyProvider) -> Vec<String> {
    let key = match provider.field_key() {
        Ok(key) => key,
        Err(e) => {
            warn!(items = items.len(), error = %e, "no key for batch decrypt, degrading to sentinel");
            return items
                .iter()
                .map(|item| {
                    if item.trim().is_empty() {
                        item.clone()
                    } else {
                        DECRYPT_SENTINEL.to_string()
                    }
                })
                .collect();
        }
    };

    let handles: Vec<_> = items
        .iter()
        .map(|item| {
            let key = key.clone();
            let item = item.clone();
            tokio::spawn(async move { decrypt_field(&item, &key) })
        })
        .collect();

    let joined = futures::future::join_all(handles).await;

    let mut out = Vec::with_capacity(joined.len());
    for (index, result) in joined.into_iter().enumerate() {
        match result {
            Ok(Ok(plaintext)) => out.push(plaintext),
            Ok(Err(e)) => {
                debug!(index, error = %e, "field decryption failed, substituting sentinel");
                out.push(DECRYPT_SENTINEL.to_string());
            }
            Err(e) => {
                warn!(index, error = %e, "decrypt task panicked, substituting sentinel");
                out.push(DECRYPT_SENTINEL.to_string());
            }
        }
    }
    out
}
