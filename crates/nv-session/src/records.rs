//! Record-level helpers: which fields of a note/tag pass through
//! encryption, and how the two read surfaces differ.
//!
//! A list view must keep rendering when one record is bad, so the batch
//! helpers substitute the sentinel per field. The detail/edit surface
//! works on a single record the user is about to modify — there the
//! failure propagates so the caller can tell the user instead of
//! silently editing a placeholder.

use nv_core::types::{NoteRecord, TagRecord};
use nv_crypto::{decrypt_field, encrypt_field, CryptoError};

use crate::batch::{decrypt_batch, encrypt_batch};
use crate::provider::KeyProvider;

/// Encrypt a note's title and content before it is persisted.
pub async fn encrypt_note(
    mut note: NoteRecord,
    provider: &dyn KeyProvider,
) -> Result<NoteRecord, CryptoError> {
    let key = provider.field_key()?;
    note.title = encrypt_field(&note.title, &key)?;
    note.content = encrypt_field(&note.content, &key)?;
    Ok(note)
}

/// Decrypt a single note for the detail/edit surface. Propagates
/// failures — the caller surfaces them to the user.
pub async fn decrypt_note(
    mut note: NoteRecord,
    provider: &dyn KeyProvider,
) -> Result<NoteRecord, CryptoError> {
    let key = provider.field_key()?;
    note.title = decrypt_field(&note.title, &key)?;
    note.content = decrypt_field(&note.content, &key)?;
    Ok(note)
}

/// Decrypt a page of notes for a list view. Each field degrades to the
/// sentinel independently; the list always comes back full length and in
/// order.
pub async fn decrypt_notes(
    notes: Vec<NoteRecord>,
    provider: &dyn KeyProvider,
) -> Vec<NoteRecord> {
    // One flat batch over both fields keeps a single fan-out; fields are
    // interleaved [title0, content0, title1, content1, ...]
    let mut fields = Vec::with_capacity(notes.len() * 2);
    for note in &notes {
        fields.push(note.title.clone());
        fields.push(note.content.clone());
    }

    let decrypted = decrypt_batch(&fields, provider).await;

    notes
        .into_iter()
        .zip(decrypted.chunks_exact(2))
        .map(|(mut note, pair)| {
            note.title = pair[0].clone();
            note.content = pair[1].clone();
            note
        })
        .collect()
}

/// Encrypt a tag's name before it is persisted.
pub async fn encrypt_tag(
    mut tag: TagRecord,
    provider: &dyn KeyProvider,
) -> Result<TagRecord, CryptoError> {
    let key = provider.field_key()?;
    tag.name = encrypt_field(&tag.name, &key)?;
    Ok(tag)
}

/// Decrypt tag names for display; failed names degrade to the sentinel.
pub async fn decrypt_tags(tags: Vec<TagRecord>, provider: &dyn KeyProvider) -> Vec<TagRecord> {
    let names: Vec<String> = tags.iter().map(|t| t.name.clone()).collect();
    let decrypted = decrypt_batch(&names, provider).await;

    tags.into_iter()
        .zip(decrypted)
        .map(|(mut tag, name)| {
            tag.name = name;
            tag
        })
        .collect()
}

/// Re-encrypt a batch of tag names that may still be legacy plaintext —
/// already-encrypted names pass through unchanged (idempotence check in
/// the cipher layer), so this is safe to run over a mixed dataset.
pub async fn migrate_tag_names(
    tags: Vec<TagRecord>,
    provider: &dyn KeyProvider,
) -> Result<Vec<TagRecord>, CryptoError> {
    let names: Vec<String> = tags.iter().map(|t| t.name.clone()).collect();
    let encrypted = encrypt_batch(&names, provider).await?;

    Ok(tags
        .into_iter()
        .zip(encrypted)
        .map(|(mut tag, name)| {
            tag.name = name;
            tag
        })
        .collect())
}
