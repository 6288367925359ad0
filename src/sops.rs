//! # Secrets Engine
//!
//! Encryption is delegated to sops. The filters see it through
//! [`SecretsEngine`]; [`SopsCli`] runs the real binary.
//!
//! ## Invocation
//!
//! ```text
//! sops --config <cfg> encrypt --input-type <codec> --output-type <codec> \
//!      --filename-override <path>
//! ```
//!
//! Content goes in on stdin and comes back on stdout. `--filename-override`
//! lets sops match `creation_rules` against the tracked path even though the
//! bytes never touch that file. sops picks fresh IVs on every encrypt, so two
//! encryptions of the same plaintext never produce the same bytes.

use crate::codec::Codec;
use crate::error::{GitSopsError, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use tracing::debug;

/// Encrypt/decrypt collaborator used by the filters.
pub trait SecretsEngine {
    fn encrypt(&self, content: &[u8], codec: Codec, filename: &Path) -> Result<Vec<u8>>;

    fn decrypt(&self, content: &[u8], codec: Codec, filename: &Path) -> Result<Vec<u8>>;
}

/// Runs the sops binary as a subprocess.
#[derive(Debug, Clone)]
pub struct SopsCli {
    binary: PathBuf,
    config: PathBuf,
}

impl SopsCli {
    pub fn new(binary: impl Into<PathBuf>, config: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            config: config.into(),
        }
    }

    fn run(
        &self,
        op: &'static str,
        content: &[u8],
        codec: Codec,
        filename: &Path,
    ) -> Result<Vec<u8>> {
        debug!(op, %codec, path = %filename.display(), "running sops");

        let engine_error = |message: String| GitSopsError::Engine {
            op,
            path: filename.to_path_buf(),
            message,
        };

        let mut child = Command::new(&self.binary)
            .arg("--config")
            .arg(&self.config)
            .arg(op)
            .args(["--input-type", codec.as_str()])
            .args(["--output-type", codec.as_str()])
            .arg("--filename-override")
            .arg(filename)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| engine_error(format!("failed to spawn {}: {e}", self.binary.display())))?;

        // Feed stdin from another thread so a full stdout pipe cannot block us.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| engine_error("stdin not captured".into()))?;
        let input = content.to_vec();
        let writer = thread::spawn(move || stdin.write_all(&input));

        let output = child.wait_with_output()?;
        let written = writer
            .join()
            .map_err(|_| engine_error("stdin writer panicked".into()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            };
            return Err(engine_error(message));
        }

        match written {
            Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e.into()),
            _ => {}
        }

        Ok(output.stdout)
    }
}

impl SecretsEngine for SopsCli {
    fn encrypt(&self, content: &[u8], codec: Codec, filename: &Path) -> Result<Vec<u8>> {
        self.run("encrypt", content, codec, filename)
    }

    fn decrypt(&self, content: &[u8], codec: Codec, filename: &Path) -> Result<Vec<u8>> {
        self.run("decrypt", content, codec, filename)
    }
}
