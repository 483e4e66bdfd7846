//! # phasenv-store
//!
//! Secret-store boundary: the [`SecretStore`] trait consumed by the
//! pipelines, a Vault KV v2 HTTP client ([`VaultStore`]), and an in-process
//! [`MemoryStore`] for tests and offline use.
//!
//! Read-side operations fail open: a phase that cannot be fetched behaves as
//! a phase with no overrides, and resolution proceeds with fewer candidates.
//! Write failures are fatal and propagate to the caller.

use std::collections::BTreeSet;

use phasenv_core::{EnvMap, InheritanceGraph, Phase};

pub mod error;
pub mod kv;
pub mod memory;

pub use error::StoreError;
pub use kv::VaultStore;
pub use memory::MemoryStore;

/// Reserved path segment (under the project prefix) holding the inheritance
/// graph.
pub const INHERITANCE_PATH: &str = "inheritance";

/// Key-value secret store scoped to one project.
pub trait SecretStore {
    /// Mapping stored for `phase`. Absence and read errors collapse to an
    /// empty mapping.
    fn read(&self, phase: &Phase) -> EnvMap;

    /// Persist `table` for `phase`, replacing the stored mapping.
    /// Empty-valued keys are never sent.
    fn write(&self, phase: &Phase, table: &EnvMap) -> Result<(), StoreError>;

    /// Phase names currently present under the project prefix. Fails open to
    /// an empty set.
    fn list_phases(&self) -> BTreeSet<String>;

    /// The project's declared inheritance graph, read from the reserved
    /// `<project>/inheritance` path. Fails open to an empty graph.
    fn inheritance_graph(&self) -> InheritanceGraph;
}
