use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitSopsError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encryption engine not found on PATH: {0}")]
    EngineNotFound(String),

    #[error("sops config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Not in a git repository")]
    NotInGitRepo,

    #[error("Repository has no working directory")]
    BareRepository,

    #[error("Missing filename argument for '{0}'")]
    MissingFilename(&'static str),

    #[error("sops {op} failed for {}: {message}", .path.display())]
    Engine {
        op: &'static str,
        path: PathBuf,
        message: String,
    },

    #[error("Checkout of {} failed: {message}", .path.display())]
    Checkout { path: PathBuf, message: String },

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, GitSopsError>;
