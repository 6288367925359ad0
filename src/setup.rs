//! # Repository Setup
//!
//! `init` registers the `sops` filter driver in the repo-local config:
//!
//! ```text
//! filter.sops.required = true
//! filter.sops.smudge   = <program> smudge %f
//! filter.sops.clean    = <program> clean %f
//! ```
//!
//! The repository counts as initialized only when all three keys exist;
//! re-running `init` then changes nothing.
//!
//! ## Bulk decrypt
//!
//! A fresh clone made before the filter existed holds ciphertext in the
//! working tree. After registering, `init` can check out every tracked file
//! whose working copy carries the sops marker again, which runs it through
//! the smudge filter. The clean filter is swapped for `cat` during that
//! checkout so git's change detection does not call sops to re-encrypt.
//! The marker check is a heuristic; see [`crate::marker`].

use crate::error::{GitSopsError, Result};
use crate::git::{VersionControl, FILTER_NAME, HEAD};
use crate::marker::is_encrypted;
use crate::prompt::Confirm;
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub const BULK_DECRYPT_PROMPT: &str =
    "Decrypt all sops-encrypted files in the working tree now?";

/// Whether to run the one-time bulk decrypt after registering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecryptChoice {
    Ask,
    Always,
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitReport {
    AlreadyInitialized,
    Initialized { decrypted: Vec<PathBuf> },
}

/// The three config entries that make up the filter registration.
pub fn filter_settings(program: &str) -> [(String, String); 3] {
    [
        (format!("filter.{FILTER_NAME}.required"), "true".to_string()),
        (
            format!("filter.{FILTER_NAME}.smudge"),
            format!("{program} smudge %f"),
        ),
        (
            format!("filter.{FILTER_NAME}.clean"),
            format!("{program} clean %f"),
        ),
    ]
}

/// Whether all three registration keys are present.
pub fn is_initialized<V: VersionControl + ?Sized>(vcs: &V) -> Result<bool> {
    for (key, _) in filter_settings("") {
        if vcs.config_get(&key)?.is_none() {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Register the filters and optionally decrypt the working tree.
///
/// `program` is the shell command git runs for the filters, already quoted.
pub fn initialize<V, C>(
    vcs: &V,
    confirm: &C,
    program: &str,
    choice: DecryptChoice,
) -> Result<InitReport>
where
    V: VersionControl + ?Sized,
    C: Confirm + ?Sized,
{
    if is_initialized(vcs)? {
        return Ok(InitReport::AlreadyInitialized);
    }

    for (key, value) in filter_settings(program) {
        debug!(%key, %value, "setting filter config");
        vcs.config_set(&key, &value)?;
    }
    info!("registered {FILTER_NAME} filter");

    let accepted = match choice {
        DecryptChoice::Always => true,
        DecryptChoice::Never => false,
        DecryptChoice::Ask => confirm.confirm(BULK_DECRYPT_PROMPT)?,
    };

    let decrypted = if accepted {
        bulk_decrypt(vcs)?
    } else {
        Vec::new()
    };

    Ok(InitReport::Initialized { decrypted })
}

/// Re-checkout every committed, tracked file that looks encrypted.
///
/// Fails if a checked-out working copy still carries the marker.
pub fn bulk_decrypt<V: VersionControl + ?Sized>(vcs: &V) -> Result<Vec<PathBuf>> {
    let mut decrypted = Vec::new();

    for path in vcs.tracked_paths()? {
        if !vcs.exists_at(HEAD, &path)? {
            debug!(path = %path.display(), "staged but not committed, skipping");
            continue;
        }

        let Some(content) = vcs.read_worktree(&path)? else {
            warn!(path = %path.display(), "missing from working tree, skipping");
            continue;
        };

        if !is_encrypted(&content) {
            continue;
        }

        info!(path = %path.display(), "decrypting");
        vcs.checkout_passthrough(HEAD, &path)?;

        let message = match vcs.read_worktree(&path)? {
            Some(content) if !is_encrypted(&content) => None,
            Some(_) => Some("working copy is still encrypted"),
            None => Some("working copy is missing"),
        };
        if let Some(message) = message {
            return Err(GitSopsError::Checkout {
                path,
                message: message.to_string(),
            });
        }

        decrypted.push(path);
    }

    Ok(decrypted)
}
