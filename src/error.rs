use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ctxpack operations
#[derive(Error, Debug)]
pub enum CtxpackError {
    /// IO error when reading files or directories
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The project root does not exist or is not a directory
    #[error("Project root not found or not a directory: {path}")]
    RootNotFound { path: PathBuf },

    /// A command needs session data that `explore` has not produced yet
    #[error("No session data in {path}. Run 'ctxpack explore <PATH>' first.")]
    MissingSession { path: PathBuf },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CtxpackError>;
