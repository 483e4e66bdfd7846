//! Atomic file writer.
//!
//! Writes go to `<path>.phasenv.tmp` first and are renamed into place
//! (atomic on POSIX), so a failed render or crash never leaves a partially
//! written env file behind.

use std::path::{Path, PathBuf};

use crate::error::{io_err, SyncError};

/// Atomically write `content` to `path`, creating parent directories as
/// needed.
pub fn atomic_write(path: &Path, content: &str) -> Result<(), SyncError> {
    let tmp = PathBuf::from(format!("{}.phasenv.tmp", path.display()));

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
    }

    std::fs::write(&tmp, content).map_err(|e| io_err(&tmp, e))?;

    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }

    tracing::info!("wrote: {}", path.display());
    Ok(())
}
