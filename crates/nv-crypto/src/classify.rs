//! Ciphertext classification and the decrypt-failure sentinel.
//!
//! Stored fields come in three shapes: envelopes written by us, legacy
//! plaintext from before field encryption was rolled out, and corrupted
//! data. The encrypt path uses `looks_encrypted` so re-encrypting an
//! already-encrypted value is a no-op; the decrypt path substitutes
//! `DECRYPT_SENTINEL` when the fallback policy applies.

/// Placeholder surfaced in list views for a field that failed to
/// decrypt. A fixed string, never raw ciphertext or an error dump.
pub const DECRYPT_SENTINEL: &str = "[decryption failed]";

/// Minimum length for a string to plausibly be one of our envelopes.
/// The shortest real envelope (28 bytes) encodes to 40 base64 chars, so
/// 20 is a conservative floor that still rejects short plaintext.
const MIN_CIPHERTEXT_CHARS: usize = 20;

/// Heuristic: is this stored string already envelope ciphertext?
///
/// True when the string is entirely standard-base64 characters, long
/// enough, and ASCII-only. Legacy plaintext notes are frequently
/// non-Latin script, which this check cleanly excludes; short ASCII
/// plaintext is excluded by the length floor.
pub fn looks_encrypted(text: &str) -> bool {
    if text.len() < MIN_CIPHERTEXT_CHARS {
        return false;
    }
    text.bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'=')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shaped_string_is_encrypted() {
        assert!(looks_encrypted(
            "AAAAAAAAAAAAAAAAqqqqqqqqqqqqqqqqqqqqqqo="
        ));
    }

    #[test]
    fn test_korean_plaintext_is_not_encrypted() {
        assert!(!looks_encrypted("회의 노트"));
    }

    #[test]
    fn test_short_ascii_is_not_encrypted() {
        assert!(!looks_encrypted("hello"));
        assert!(!looks_encrypted(""));
    }

    #[test]
    fn test_long_prose_is_not_encrypted() {
        // Spaces and punctuation are outside the base64 alphabet
        assert!(!looks_encrypted(
            "meeting notes from tuesday, action items below"
        ));
    }

    #[test]
    fn test_long_base64_like_plaintext_is_encrypted() {
        // The heuristic is intentionally shape-based: a 20+ char string of
        // pure base64 characters is treated as ciphertext even if a human
        // typed it.
        assert!(looks_encrypted("abcdefghijklmnopqrstuv"));
    }
}
