//! # Settings
//!
//! Process-level configuration resolved once at startup and threaded into
//! the adapters, never read ad hoc afterwards.
//!
//! ## Sources
//!
//! - `SOPS_CONFIG`: path to the sops config file. Defaults to
//!   `~/.config/sops/config.yaml`.
//! - `GIT_SOPS_SOPS_BIN`: engine binary name or path. Defaults to `sops`,
//!   looked up on `PATH`.
//!
//! ## Preconditions
//!
//! [`Settings::check`] refuses to run when the engine binary cannot be
//! resolved or the config file does not exist. The git working tree check
//! lives in [`crate::git::GitRepo::open`].

use crate::error::{GitSopsError, Result};
use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

pub const SOPS_CONFIG_ENV: &str = "SOPS_CONFIG";
pub const ENGINE_BIN_ENV: &str = "GIT_SOPS_SOPS_BIN";
pub const DEFAULT_ENGINE: &str = "sops";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Engine binary as configured (bare name or path).
    pub engine: PathBuf,
    /// sops config file passed as `--config`.
    pub sops_config: PathBuf,
    /// `PATH` searched for a bare engine name.
    pub path_env: Option<OsString>,
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::resolve(
            env::var_os(SOPS_CONFIG_ENV),
            env::var_os(ENGINE_BIN_ENV),
            dirs::home_dir(),
            env::var_os("PATH"),
        )
    }

    /// Resolve settings from explicit values.
    pub fn resolve(
        sops_config: Option<OsString>,
        engine: Option<OsString>,
        home: Option<PathBuf>,
        path_env: Option<OsString>,
    ) -> Result<Self> {
        let sops_config = match sops_config.filter(|v| !v.is_empty()) {
            Some(path) => PathBuf::from(path),
            None => home
                .map(|home| default_config_path(&home))
                .ok_or_else(|| {
                    GitSopsError::Other(format!(
                        "Cannot determine home directory; set {SOPS_CONFIG_ENV}"
                    ))
                })?,
        };

        let engine = engine
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ENGINE));

        Ok(Self {
            engine,
            sops_config,
            path_env,
        })
    }

    /// Verify the engine and config exist. Returns the resolved engine path.
    pub fn check(&self) -> Result<PathBuf> {
        let engine = resolve_engine(&self.engine, self.path_env.as_deref())
            .ok_or_else(|| GitSopsError::EngineNotFound(self.engine.display().to_string()))?;

        if !self.sops_config.is_file() {
            return Err(GitSopsError::ConfigNotFound(self.sops_config.clone()));
        }

        Ok(engine)
    }
}

/// `~/.config/sops/config.yaml`
pub fn default_config_path(home: &Path) -> PathBuf {
    home.join(".config").join("sops").join("config.yaml")
}

/// Find the engine binary. Names containing a separator are taken as paths.
pub fn resolve_engine(engine: &Path, path_var: Option<&OsStr>) -> Option<PathBuf> {
    if engine.components().count() > 1 {
        return engine.is_file().then(|| engine.to_path_buf());
    }

    env::split_paths(path_var?)
        .map(|dir| dir.join(engine))
        .find(|candidate| candidate.is_file())
}
