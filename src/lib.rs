//! # git-sops
//!
//! Transparent [sops](https://github.com/getsops/sops) encryption of files in a
//! git repository, driven by git's clean/smudge filters.
//!
//! ## Features
//!
//! - **Transparent Encryption**: Files are encrypted by sops when staged and decrypted on checkout
//! - **Stable Ciphertext**: Unchanged plaintext re-uses the committed ciphertext, so no spurious diffs
//! - **Structure-Aware**: JSON, YAML, dotenv and INI files keep their keys readable; other files are opaque blobs
//! - **One-Step Setup**: `init` registers the filters and can decrypt an existing clone in place
//!
//! ## Quick Start
//!
//! ```bash
//! # Inside a git repository, with sops and its config available
//! git-sops init
//!
//! # Choose which files go through the filter
//! echo "*.env filter=sops" >> .gitattributes
//! echo "secrets/*.yaml filter=sops" >> .gitattributes
//! git add .gitattributes
//! git commit -m "Encrypt secrets with sops"
//! ```
//!
//! ## How It Works
//!
//! 1. **Clean filter** (`git add`): the plaintext is compared with the decrypted
//!    `HEAD` version. Unchanged files re-emit the committed ciphertext, anything
//!    else is encrypted by sops.
//! 2. **Smudge filter** (`git checkout`): the stored ciphertext is decrypted by sops.
//!
//! ```text
//! working tree ──clean──▶ [changed? sops encrypt : committed blob] ──▶ .git
//! .git ──smudge──▶ sops decrypt ──▶ working tree
//! ```
//!
//! Encryption keys and access policy belong to sops and its own config file
//! (`SOPS_CONFIG`, default `~/.config/sops/config.yaml`).
//!
//! ## Module Overview
//!
//! - [`codec`] - Path to sops content type mapping
//! - [`marker`] - Heuristic `ENC[` detection
//! - [`filter`] - Clean/smudge decision logic
//! - [`setup`] - Filter registration and bulk decrypt
//! - [`git`] - Git access ([`VersionControl`], [`GitRepo`])
//! - [`sops`] - Secrets engine ([`SecretsEngine`], [`SopsCli`])
//! - [`prompt`] - Interactive confirmation
//! - [`settings`] - Environment and startup preconditions
//! - [`error`] - Error types and unified error handling
//!
//! ## Commands
//!
//! - `init [--decrypt | --no-decrypt]` - Register the filters, optionally decrypt the working tree
//! - `smudge FILE` - Filter used by git on checkout
//! - `clean FILE` - Filter used by git on add
//!
//! ## Logging
//!
//! Diagnostics go to stderr, never stdout, since stdout carries file content
//! back to git. Set `GIT_SOPS_LOG=debug` to see filter decisions.

pub mod codec;
pub mod error;
pub mod filter;
pub mod git;
pub mod marker;
pub mod prompt;
pub mod settings;
pub mod setup;
pub mod sops;


// Re-export commonly used types
pub use codec::{classify, Codec};
pub use error::{GitSopsError, Result};
pub use filter::Cleaned;
pub use git::{GitRepo, VersionControl};
pub use marker::is_encrypted;
pub use settings::Settings;
pub use sops::{SecretsEngine, SopsCli};
