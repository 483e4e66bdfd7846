//! Error types for phasenv-sync.

use std::path::PathBuf;

use thiserror::Error;

use phasenv_renderer::RenderError;
use phasenv_store::StoreError;

/// All errors that can arise from the phase-transition pipelines.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the rendering engine (syntax error or, in strict mode,
    /// an unresolved required key).
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// A fatal store error (write path only — reads fail open).
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The requested phase could not be determined from the target filename.
    #[error("no phase mapped for target file '{target}'; pass an explicit phase")]
    UnknownPhase { target: String },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
