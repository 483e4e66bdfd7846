//! Domain types for phasenv.
//!
//! A [`Phase`] is a named deployment environment. Phases are plain strings,
//! not an enum — the store may report arbitrary project-defined names.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The reserved phase holding values shared by every environment.
pub const COMMON_PHASE: &str = "common";

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// A strongly-typed deployment phase name (`common`, `local`, `dev`, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Phase(pub String);

impl Phase {
    /// The reserved `common` phase.
    pub fn common() -> Self {
        Self(COMMON_PHASE.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Phase {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Phase {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Environment mapping
// ---------------------------------------------------------------------------

/// Flat mapping from variable key to value for one phase.
///
/// `BTreeMap` keeps iteration order deterministic, which makes serialized
/// output and template-sync append order reproducible.
pub type EnvMap = BTreeMap<String, String>;

/// Drop entries with empty values.
///
/// Empty strings mean "absent" for resolution purposes and are never written
/// to the store.
pub fn filter_empty(table: &EnvMap) -> EnvMap {
    table
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

// ---------------------------------------------------------------------------
// Inheritance graph
// ---------------------------------------------------------------------------

/// Serialized parent value: a single name or a list of names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ParentSpec {
    One(String),
    Many(Vec<String>),
}

/// Directed mapping from phase to its parent phase(s), defining fallback
/// order for inheritance resolution.
///
/// The graph is not validated on construction; [`crate::resolve::resolve_chain`]
/// guarantees termination even when edges form a cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, ParentSpec>",
    into = "BTreeMap<String, ParentSpec>"
)]
pub struct InheritanceGraph {
    edges: BTreeMap<String, Vec<String>>,
}

impl InheritanceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// The conventional hierarchy used when a project declares no graph of
    /// its own: `prod → stage → dev → local`.
    pub fn default_hierarchy() -> Self {
        let mut graph = Self::new();
        graph.insert("prod", ["stage"]);
        graph.insert("stage", ["dev"]);
        graph.insert("dev", ["local"]);
        graph
    }

    pub fn insert<P, I, S>(&mut self, phase: P, parents: I)
    where
        P: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.edges.insert(
            phase.into(),
            parents.into_iter().map(Into::into).collect(),
        );
    }

    /// Declared parents of `phase`, in declaration order. Empty when the
    /// phase has no entry.
    pub fn parents(&self, phase: &str) -> &[String] {
        self.edges.get(phase).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Phases that declare at least one parent.
    pub fn phases(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }
}

impl From<BTreeMap<String, ParentSpec>> for InheritanceGraph {
    fn from(raw: BTreeMap<String, ParentSpec>) -> Self {
        let edges = raw
            .into_iter()
            .map(|(phase, spec)| {
                let parents = match spec {
                    ParentSpec::One(p) => vec![p],
                    ParentSpec::Many(ps) => ps,
                };
                (phase, parents)
            })
            .collect();
        Self { edges }
    }
}

impl From<InheritanceGraph> for BTreeMap<String, ParentSpec> {
    fn from(graph: InheritanceGraph) -> Self {
        graph
            .edges
            .into_iter()
            .map(|(phase, mut parents)| {
                let spec = if parents.len() == 1 {
                    ParentSpec::One(parents.remove(0))
                } else {
                    ParentSpec::Many(parents)
                };
                (phase, spec)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_display_and_from() {
        assert_eq!(Phase::from("dev").to_string(), "dev");
        assert_eq!(Phase::from(String::from("prod")).as_str(), "prod");
        assert_eq!(Phase::common().as_str(), COMMON_PHASE);
    }

    #[test]
    fn filter_empty_drops_blank_values() {
        let mut table = EnvMap::new();
        table.insert("A".into(), "1".into());
        table.insert("B".into(), String::new());
        let filtered = filter_empty(&table);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.get("A"), Some(&"1".to_string()));
        assert!(!filtered.contains_key("B"));
    }

    #[test]
    fn default_hierarchy_edges() {
        let graph = InheritanceGraph::default_hierarchy();
        assert_eq!(graph.parents("prod"), ["stage"]);
        assert_eq!(graph.parents("stage"), ["dev"]);
        assert_eq!(graph.parents("dev"), ["local"]);
        assert!(graph.parents("local").is_empty());
    }

    #[test]
    fn graph_deserializes_single_parent_string() {
        let graph: InheritanceGraph =
            serde_json::from_str(r#"{"prod": "stage", "stage": "dev"}"#).unwrap();
        assert_eq!(graph.parents("prod"), ["stage"]);
        assert_eq!(graph.parents("stage"), ["dev"]);
    }

    #[test]
    fn graph_deserializes_parent_list() {
        let graph: InheritanceGraph =
            serde_json::from_str(r#"{"prod": ["stage", "common"]}"#).unwrap();
        assert_eq!(graph.parents("prod"), ["stage", "common"]);
    }

    #[test]
    fn graph_serde_roundtrip() {
        let mut graph = InheritanceGraph::new();
        graph.insert("prod", ["stage"]);
        graph.insert("stage", ["dev", "local"]);
        let json = serde_json::to_string(&graph).unwrap();
        let back: InheritanceGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(graph, back);
    }
}
