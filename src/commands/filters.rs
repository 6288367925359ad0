use git_sops::error::Result;
use git_sops::filter::{self, Cleaned};
use git_sops::{GitRepo, SopsCli};
use std::io::{self, Read, Write};
use std::path::Path;

/// Clean filter implementation (called by git during add/commit)
pub fn clean(repo: &GitRepo, engine: &SopsCli, path: &Path) -> Result<()> {
    let mut input = Vec::new();
    io::stdin().read_to_end(&mut input)?;

    let cleaned = filter::clean(repo, engine, path, &input)?;

    // Reused ciphertext is not reported; only actual re-encryption is.
    if let Cleaned::Encrypted { codec, .. } = &cleaned {
        eprintln!("[git-sops] {}: {}", codec, path.display());
    }

    let mut stdout = io::stdout().lock();
    stdout.write_all(cleaned.bytes())?;
    stdout.flush()?;

    Ok(())
}

/// Smudge filter implementation (called by git during checkout)
pub fn smudge(engine: &SopsCli, path: &Path) -> Result<()> {
    let mut input = Vec::new();
    io::stdin().read_to_end(&mut input)?;

    let (codec, plaintext) = filter::smudge(engine, path, &input)?;
    eprintln!("[git-sops] {}: {}", codec, path.display());

    let mut stdout = io::stdout().lock();
    stdout.write_all(&plaintext)?;
    stdout.flush()?;

    Ok(())
}
