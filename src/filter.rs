//! # Clean and Smudge Filters
//!
//! Git runs one filter process per file:
//!
//! ```text
//! git add       → clean FILE  : working plaintext (stdin) → stored ciphertext (stdout)
//! git checkout  → smudge FILE : stored ciphertext (stdin) → working plaintext (stdout)
//! ```
//!
//! ## Change detection
//!
//! sops encryption is non-deterministic, so encrypting unchanged plaintext
//! again would still produce a new blob and a spurious diff on every
//! `git add`. Equality can only be decided on the plaintext side:
//!
//! 1. A path absent from `HEAD` is new and always encrypted.
//! 2. Otherwise the committed blob is decrypted with the path's codec and
//!    compared byte-for-byte with the incoming plaintext. Equal content
//!    re-emits the committed ciphertext untouched.
//! 3. Anything else is encrypted fresh.
//!
//! A failure while reading or decrypting the committed blob is an error,
//! not a reason to re-encrypt: a broken key or config must not show up as
//! an ordinary edit.

use crate::codec::{classify, Codec};
use crate::error::Result;
use crate::git::{VersionControl, HEAD};
use crate::sops::SecretsEngine;
use std::path::Path;
use tracing::debug;

/// Output chosen by the clean filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cleaned {
    /// Plaintext matches `HEAD`; the committed ciphertext is re-emitted.
    Reused(Vec<u8>),
    /// New or changed plaintext, freshly encrypted.
    Encrypted { codec: Codec, ciphertext: Vec<u8> },
}

impl Cleaned {
    /// Bytes to hand back to git.
    pub fn bytes(&self) -> &[u8] {
        match self {
            Cleaned::Reused(ciphertext) => ciphertext,
            Cleaned::Encrypted { ciphertext, .. } => ciphertext,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Cleaned::Reused(ciphertext) => ciphertext,
            Cleaned::Encrypted { ciphertext, .. } => ciphertext,
        }
    }
}

/// Decide between reusing the committed ciphertext and encrypting `plaintext`.
pub fn clean<V, E>(vcs: &V, engine: &E, path: &Path, plaintext: &[u8]) -> Result<Cleaned>
where
    V: VersionControl + ?Sized,
    E: SecretsEngine + ?Sized,
{
    if vcs.exists_at(HEAD, path)? {
        let codec = classify(path);
        let committed = vcs.read_blob(HEAD, path)?;
        let previous = engine.decrypt(&committed, codec, path)?;

        if previous == plaintext {
            debug!(path = %path.display(), "plaintext unchanged, reusing committed ciphertext");
            return Ok(Cleaned::Reused(committed));
        }
        debug!(path = %path.display(), "plaintext changed");
    } else {
        debug!(path = %path.display(), "not in {HEAD}, treating as new");
    }

    let codec = classify(path);
    let ciphertext = engine.encrypt(plaintext, codec, path)?;
    Ok(Cleaned::Encrypted { codec, ciphertext })
}

/// Decrypt stored ciphertext for the working tree.
pub fn smudge<E>(engine: &E, path: &Path, ciphertext: &[u8]) -> Result<(Codec, Vec<u8>)>
where
    E: SecretsEngine + ?Sized,
{
    let codec = classify(path);
    let plaintext = engine.decrypt(ciphertext, codec, path)?;
    Ok((codec, plaintext))
}
