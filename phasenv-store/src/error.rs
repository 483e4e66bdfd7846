//! Error types for phasenv-store.

use thiserror::Error;

/// All errors that can arise from secret-store operations.
///
/// Only write paths surface these to callers; read paths collapse them to
/// empty results at the [`crate::SecretStore`] boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network-level failure (DNS, refused connection, timeout).
    #[error("vault request failed: {0}")]
    Transport(String),

    /// Non-success HTTP status from the store.
    #[error("vault returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Response body could not be read or decoded as JSON.
    #[error("vault response decode failed: {0}")]
    Decode(#[from] std::io::Error),

    /// Response JSON did not match the expected KV v2 payload shape.
    #[error("vault payload parse failed: {0}")]
    Payload(#[from] serde_json::Error),
}
