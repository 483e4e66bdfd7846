//! In-process [`SecretStore`] used by pipeline and renderer tests, and handy
//! for offline experimentation.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use phasenv_core::{filter_empty, EnvMap, InheritanceGraph, Phase};

use crate::error::StoreError;
use crate::SecretStore;

/// Mutex-backed store with the same write semantics as [`crate::VaultStore`]
/// (whole-mapping replacement, empty values filtered).
#[derive(Debug, Default)]
pub struct MemoryStore {
    secrets: Mutex<BTreeMap<String, EnvMap>>,
    graph: Mutex<InheritanceGraph>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_graph(graph: InheritanceGraph) -> Self {
        let store = Self::new();
        store.set_graph(graph);
        store
    }

    /// Replace the stored mapping for `phase` without empty-value filtering.
    /// Test seams use this to plant empty values the write path would drop.
    pub fn seed(&self, phase: &str, entries: &[(&str, &str)]) {
        let table = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.secrets
            .lock()
            .expect("memory store poisoned")
            .insert(phase.to_owned(), table);
    }

    pub fn set_graph(&self, graph: InheritanceGraph) {
        *self.graph.lock().expect("memory store poisoned") = graph;
    }
}

impl SecretStore for MemoryStore {
    fn read(&self, phase: &Phase) -> EnvMap {
        self.secrets
            .lock()
            .expect("memory store poisoned")
            .get(phase.as_str())
            .cloned()
            .unwrap_or_default()
    }

    fn write(&self, phase: &Phase, table: &EnvMap) -> Result<(), StoreError> {
        self.secrets
            .lock()
            .expect("memory store poisoned")
            .insert(phase.as_str().to_owned(), filter_empty(table));
        Ok(())
    }

    fn list_phases(&self) -> BTreeSet<String> {
        self.secrets
            .lock()
            .expect("memory store poisoned")
            .keys()
            .cloned()
            .collect()
    }

    fn inheritance_graph(&self) -> InheritanceGraph {
        self.graph.lock().expect("memory store poisoned").clone()
    }
}
