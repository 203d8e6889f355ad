use serde::{Deserialize, Serialize};

/// A persisted note. `title` and `content` hold either plaintext (in
/// memory, after decryption) or envelope ciphertext (as stored) — the
/// storage collaborator treats both as opaque text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    /// Tag IDs attached to this note
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A persisted tag. `name` passes through field encryption; `color` and
/// the flags do not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Key-related metadata stored on the user record at PIN-set time.
///
/// The salt is generated once and never rotated; its absence means the
/// user has not enrolled a PIN yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserKeyMeta {
    pub pin_set: bool,
    pub user_salt: Option<String>,
    /// SHA-256 hex digest of the PIN, used only for the entry gate —
    /// never as key material.
    pub pin_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_record_json_roundtrip() {
        let note = NoteRecord {
            id: "m1".into(),
            user_id: "u1".into(),
            title: "t".into(),
            content: "c".into(),
            tags: vec!["tag1".into()],
            created_at: "2026-01-01T00:00:00Z".into(),
            updated_at: "2026-01-02T00:00:00Z".into(),
        };
        let json = serde_json::to_string(&note).unwrap();
        let parsed: NoteRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(note, parsed);
    }

    #[test]
    fn test_user_key_meta_defaults() {
        let meta: UserKeyMeta = serde_json::from_str("{}").unwrap();
        assert!(!meta.pin_set);
        assert!(meta.user_salt.is_none());
        assert!(meta.pin_hash.is_none());
    }
}
