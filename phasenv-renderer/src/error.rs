//! Error types for phasenv-renderer.

use std::fmt;

use thiserror::Error;

/// The template-facing lookup primitive that required a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Load,
    LoadCommon,
    LoadInheritance,
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Load => write!(f, "load"),
            Primitive::LoadCommon => write!(f, "load_common"),
            Primitive::LoadInheritance => write!(f, "load_inheritance"),
        }
    }
}

/// All errors that can arise from template rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template syntax error or bare undefined-variable reference. Fatal in
    /// both render modes.
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    /// Strict mode only: a lookup primitive could not resolve its key to a
    /// non-empty value.
    #[error("unresolved required key '{key}' (required by {primitive})")]
    UnresolvedKey { key: String, primitive: Primitive },
}
