//! Phase-inheritance resolution: lookup-chain computation and key lookup.
//!
//! All functions here are pure over pre-fetched mappings. Callers fetch every
//! phase map once before resolving, so a full render pass sees one consistent
//! snapshot of the store.

use std::collections::BTreeMap;

use crate::types::{EnvMap, InheritanceGraph, Phase};

/// Per-phase mappings pre-fetched for one resolution pass.
pub type PhaseMaps = BTreeMap<Phase, EnvMap>;

/// A resolved value and the phase in the chain that supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub value: String,
    pub source: Phase,
}

/// Compute the ordered lookup chain for `phase`.
///
/// The chain starts with `phase` and is extended depth-first through declared
/// parents, in declaration order. A phase is never visited twice, so
/// self-loops and cycles truncate the walk instead of diverging. The result
/// always has at least one element and no duplicates; earlier phases shadow
/// later ones during resolution.
pub fn resolve_chain(phase: &Phase, graph: &InheritanceGraph) -> Vec<Phase> {
    let mut chain: Vec<Phase> = Vec::new();
    let mut pending: Vec<String> = vec![phase.0.clone()];

    while let Some(current) = pending.pop() {
        if chain.iter().any(|p| p.0 == current) {
            continue;
        }
        // Reversed so the first declared parent is walked first.
        for parent in graph.parents(&current).iter().rev() {
            if *parent != current {
                pending.push(parent.clone());
            }
        }
        chain.push(Phase(current));
    }
    chain
}

/// Resolve `key` against `chain` in priority order.
///
/// The first phase whose mapping holds a non-empty value wins; empty strings
/// count as absent. Returns `None` when the chain is exhausted.
pub fn resolve_key(key: &str, chain: &[Phase], maps: &PhaseMaps) -> Option<Resolved> {
    for phase in chain {
        if let Some(value) = non_empty(maps.get(phase), key) {
            return Some(Resolved {
                value: value.to_owned(),
                source: phase.clone(),
            });
        }
    }
    None
}

/// Look `key` up in `phase`'s own mapping only — no inheritance fallback.
pub fn lookup_plain(key: &str, phase: &Phase, maps: &PhaseMaps) -> Option<String> {
    non_empty(maps.get(phase), key).map(str::to_owned)
}

/// Look `key` up in the reserved `common` phase's mapping, regardless of
/// chain.
pub fn lookup_common(key: &str, maps: &PhaseMaps) -> Option<String> {
    non_empty(maps.get(&Phase::common()), key).map(str::to_owned)
}

fn non_empty<'m>(map: Option<&'m EnvMap>, key: &str) -> Option<&'m str> {
    map.and_then(|m| m.get(key))
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}
