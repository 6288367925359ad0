//! # Content Codecs
//!
//! Maps a tracked path to the content type handed to sops as
//! `--input-type` / `--output-type`. Structured codecs let sops encrypt
//! values while leaving keys and layout readable; `binary` makes it treat
//! the stream as one opaque blob.
//!
//! ## Matching
//!
//! Checks are ordered, case-sensitive substring matches against the path,
//! first match wins:
//!
//! | Pattern | Codec |
//! |---|---|
//! | `.json` | `json` |
//! | `.yaml`, `.yml` | `yaml` |
//! | `.env`, `.dotenv` | `dotenv` |
//! | `.ini` | `ini` |
//! | anything else | `binary` |
//!
//! Substring matching means suffixed backups keep their codec
//! (`config.yml.bak` is still yaml).

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::GitSopsError;

/// Content type hint for the secrets engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    Json,
    Yaml,
    Dotenv,
    Ini,
    Binary,
}

const PATTERNS: &[(&str, Codec)] = &[
    (".json", Codec::Json),
    (".yaml", Codec::Yaml),
    (".yml", Codec::Yaml),
    (".env", Codec::Dotenv),
    (".dotenv", Codec::Dotenv),
    (".ini", Codec::Ini),
];

impl Codec {
    pub const ALL: [Codec; 5] = [
        Codec::Json,
        Codec::Yaml,
        Codec::Dotenv,
        Codec::Ini,
        Codec::Binary,
    ];

    /// Name understood by `sops --input-type`.
    pub fn as_str(self) -> &'static str {
        match self {
            Codec::Json => "json",
            Codec::Yaml => "yaml",
            Codec::Dotenv => "dotenv",
            Codec::Ini => "ini",
            Codec::Binary => "binary",
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Codec {
    type Err = GitSopsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Codec::ALL
            .into_iter()
            .find(|codec| codec.as_str() == s)
            .ok_or_else(|| GitSopsError::Other(format!("Unknown codec: {s}")))
    }
}

/// Classify a path. Never fails; unmatched paths are binary.
pub fn classify(path: impl AsRef<Path>) -> Codec {
    let path = path.as_ref().to_string_lossy();
    PATTERNS
        .iter()
        .find(|(pattern, _)| path.contains(pattern))
        .map(|(_, codec)| *codec)
        .unwrap_or(Codec::Binary)
}
