//! Heuristic detection of sops-encrypted content.
//!
//! sops tags every encrypted value as `ENC[<cipher>,data:...,iv:...,tag:...]`.
//! Looking for the literal `ENC[` is not a format parser: plaintext that
//! happens to contain the marker is reported as encrypted, and a future
//! engine using another tag would be missed. Only the bulk decrypt offered
//! by `init` consults this; the clean/smudge filters never do.

/// Marker that prefixes every sops ciphertext token.
pub const ENCRYPTION_MARKER: &[u8] = b"ENC[";

/// Best-effort check for sops ciphertext tokens.
pub fn is_encrypted(content: &[u8]) -> bool {
    content
        .windows(ENCRYPTION_MARKER.len())
        .any(|window| window == ENCRYPTION_MARKER)
}
