//! # Version Control Access
//!
//! The filters only need a narrow slice of git: committed blobs at a
//! revision, the list of tracked paths, the working tree, repo-local config
//! and one forced checkout. [`VersionControl`] is that slice; [`GitRepo`] is
//! the production adapter.
//!
//! Reads and config go through libgit2. The bulk-decrypt checkout shells out
//! to `git`, because libgit2 does not run external filter drivers and the
//! whole point of that checkout is to run the smudge filter.

use crate::error::{GitSopsError, Result};
use git2::{ConfigLevel, ErrorCode, ObjectType, Repository, Tree};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Revision the clean filter compares against.
pub const HEAD: &str = "HEAD";

/// Filter driver name used in `.gitattributes` (`filter=sops`) and config.
pub const FILTER_NAME: &str = "sops";

/// Git operations the filters depend on.
pub trait VersionControl {
    /// Whether `path` is a file in the tree of `rev`. An unborn branch has no files.
    fn exists_at(&self, rev: &str, path: &Path) -> Result<bool>;

    /// Contents of `path` as recorded at `rev`.
    fn read_blob(&self, rev: &str, path: &Path) -> Result<Vec<u8>>;

    /// Paths in the index, relative to the repository root.
    fn tracked_paths(&self) -> Result<Vec<PathBuf>>;

    /// Current working tree content, `None` when the file is absent.
    fn read_worktree(&self, path: &Path) -> Result<Option<Vec<u8>>>;

    /// Repo-local config value.
    fn config_get(&self, key: &str) -> Result<Option<String>>;

    /// Write a repo-local config value.
    fn config_set(&self, key: &str, value: &str) -> Result<()>;

    /// Rewrite the working copy of `path` from `rev` through the smudge
    /// filter, with the clean filter replaced by the identity transform.
    fn checkout_passthrough(&self, rev: &str, path: &Path) -> Result<()>;
}

pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Open the repository containing `path`. Bare repositories are rejected.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let repo = Repository::discover(path).map_err(|_| GitSopsError::NotInGitRepo)?;
        if repo.workdir().is_none() {
            return Err(GitSopsError::BareRepository);
        }
        Ok(Self { repo })
    }

    /// Get repository root path
    pub fn workdir(&self) -> Result<&Path> {
        self.repo.workdir().ok_or(GitSopsError::BareRepository)
    }

    fn tree_at(&self, rev: &str) -> Result<Option<Tree<'_>>> {
        match self.repo.revparse_single(rev) {
            Ok(object) => Ok(Some(object.peel_to_tree()?)),
            Err(e) if matches!(e.code(), ErrorCode::NotFound | ErrorCode::UnbornBranch) => {
                debug!(rev, "revision does not resolve");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn index_path(raw: &[u8]) -> Result<PathBuf> {
    use std::os::unix::ffi::OsStrExt;
    Ok(PathBuf::from(std::ffi::OsStr::from_bytes(raw)))
}

#[cfg(not(unix))]
fn index_path(raw: &[u8]) -> Result<PathBuf> {
    std::str::from_utf8(raw).map(PathBuf::from).map_err(|_| {
        GitSopsError::Other(format!(
            "Index path is not valid UTF-8: {}",
            String::from_utf8_lossy(raw)
        ))
    })
}

impl VersionControl for GitRepo {
    fn exists_at(&self, rev: &str, path: &Path) -> Result<bool> {
        let Some(tree) = self.tree_at(rev)? else {
            return Ok(false);
        };

        match tree.get_path(path) {
            Ok(entry) => Ok(entry.kind() == Some(ObjectType::Blob)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn read_blob(&self, rev: &str, path: &Path) -> Result<Vec<u8>> {
        let tree = self.tree_at(rev)?.ok_or_else(|| {
            GitSopsError::Other(format!("Revision {rev} does not exist"))
        })?;

        let entry = tree.get_path(path)?;
        let blob = entry.to_object(&self.repo)?.peel_to_blob()?;
        Ok(blob.content().to_vec())
    }

    fn tracked_paths(&self) -> Result<Vec<PathBuf>> {
        let index = self.repo.index()?;
        index.iter().map(|entry| index_path(&entry.path)).collect()
    }

    fn read_worktree(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match fs::read(self.workdir()?.join(path)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn config_get(&self, key: &str) -> Result<Option<String>> {
        let config = self.repo.config()?.open_level(ConfigLevel::Local)?;
        match config.get_string(key) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn config_set(&self, key: &str, value: &str) -> Result<()> {
        let mut config = self.repo.config()?.open_level(ConfigLevel::Local)?;
        config.set_str(key, value)?;
        Ok(())
    }

    fn checkout_passthrough(&self, rev: &str, path: &Path) -> Result<()> {
        let workdir = self.workdir()?;

        // git skips files whose index stat data is current, even with --force
        match fs::remove_file(workdir.join(path)) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let output = Command::new("git")
            .arg("-c")
            .arg(format!("filter.{FILTER_NAME}.clean=cat"))
            .args(["checkout", "--force", rev, "--"])
            .arg(path)
            .current_dir(workdir)
            .output()?;

        if !output.status.success() {
            return Err(GitSopsError::Checkout {
                path: path.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
