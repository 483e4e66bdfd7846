//! Local file boundary — well-known filename ↔ phase mapping and template
//! bootstrap.
//!
//! # Filename convention
//!
//! | File           | Phase    |
//! |----------------|----------|
//! | `.env.common`  | `common` |
//! | `.env`         | `local`  |
//! | `.env.<name>`  | `<name>` |
//!
//! The `.env.<name>` rule covers `dev`/`stage`/`prod` as well as
//! project-defined phase names.

use std::path::Path;

use phasenv_core::Phase;

use crate::error::{io_err, SyncError};

/// Default local env file.
pub const DEFAULT_TARGET: &str = ".env";

/// Default template file.
pub const DEFAULT_TEMPLATE: &str = ".env.template";

/// Phase implied by a well-known env filename, if any.
pub fn phase_for_file(file_name: &str) -> Option<Phase> {
    match file_name {
        ".env" => Some(Phase::from("local")),
        ".env.template" => None,
        _ => file_name
            .strip_prefix(".env.")
            .filter(|rest| !rest.is_empty())
            .map(Phase::from),
    }
}

/// Conventional filename for a phase's local env file.
pub fn file_for_phase(phase: &Phase) -> String {
    match phase.as_str() {
        "local" => DEFAULT_TARGET.to_owned(),
        other => format!(".env.{other}"),
    }
}

/// Read the template, creating it empty on first use.
pub fn ensure_template(path: &Path) -> Result<String, SyncError> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
            }
        }
        std::fs::write(path, "").map_err(|e| io_err(path, e))?;
        return Ok(String::new());
    }
    std::fs::read_to_string(path).map_err(|e| io_err(path, e))
}
