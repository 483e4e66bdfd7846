//! Phase-transition pipelines — `commit`, `push`, `pull`, `build`.
//!
//! Each operation is a short composition over the serializer, the secret
//! store, the inheritance resolver and the template renderer. Every store
//! mapping a render needs is fetched up front, so one render pass always
//! resolves against a single consistent snapshot.

use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;

use phasenv_core::{
    resolve_chain, DotEnvSerializer, EnvSerializer, InheritanceGraph, Phase, PhaseMaps,
};
use phasenv_renderer::{snapshot_phases, LookupContext, RenderMode, Renderer};
use phasenv_store::SecretStore;

use crate::error::{io_err, SyncError};
use crate::files;
use crate::template;
use crate::writer::atomic_write;

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// Root directory plus target/template filenames for one invocation.
#[derive(Debug, Clone)]
pub struct EnvPaths {
    pub root: PathBuf,
    pub target: String,
    pub template: String,
}

impl EnvPaths {
    pub fn new(root: impl Into<PathBuf>, target: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            target: target.into(),
            template: template.into(),
        }
    }

    /// Defaults (`.env` / `.env.template`) under `root`.
    pub fn with_defaults(root: impl Into<PathBuf>) -> Self {
        Self::new(root, files::DEFAULT_TARGET, files::DEFAULT_TEMPLATE)
    }

    pub fn target_path(&self) -> PathBuf {
        self.root.join(&self.target)
    }

    pub fn template_path(&self) -> PathBuf {
        self.root.join(&self.template)
    }

    /// Phase implied by the target filename, when it follows the well-known
    /// naming convention.
    pub fn implied_phase(&self) -> Option<Phase> {
        files::phase_for_file(&self.target)
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of a store write (`push`, and the first half of `commit`).
#[derive(Debug, Clone, Serialize)]
pub struct StoreWrite {
    pub phase: Phase,
    /// Keys sent to the store.
    pub written: usize,
    /// Keys dropped because their value was empty.
    pub skipped_empty: usize,
}

/// Result of `commit`: the store write plus template synchronization.
#[derive(Debug, Clone, Serialize)]
pub struct CommitOutcome {
    #[serde(flatten)]
    pub write: StoreWrite,
    /// Keys newly declared in the template, sorted.
    pub template_added: Vec<String>,
}

/// Result of `pull` or `build`: the rendered file and the chain used.
#[derive(Debug, Clone, Serialize)]
pub struct RenderOutcome {
    pub phase: Phase,
    pub chain: Vec<Phase>,
    pub path: PathBuf,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Read the local target file and persist its mapping to the store.
///
/// Empty-valued keys are counted but never sent. A store write failure is
/// fatal and aborts the operation.
pub fn push(store: &dyn SecretStore, phase: &Phase, paths: &EnvPaths) -> Result<StoreWrite, SyncError> {
    let path = paths.target_path();
    let content = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    let table = DotEnvSerializer.unserialize(&content);

    let skipped_empty = table.values().filter(|v| v.is_empty()).count();
    store.write(phase, &table)?;

    Ok(StoreWrite {
        phase: phase.clone(),
        written: table.len() - skipped_empty,
        skipped_empty,
    })
}

/// `push`, then declare any newly-appeared store keys in the template.
///
/// The template diff runs against a re-fetch of the stored mapping, so keys
/// written by anyone since the last sync are picked up too.
pub fn commit(
    store: &dyn SecretStore,
    phase: &Phase,
    paths: &EnvPaths,
) -> Result<CommitOutcome, SyncError> {
    let write = push(store, phase, paths)?;

    let known = store.read(phase);
    let template_path = paths.template_path();
    let existing = files::ensure_template(&template_path)?;
    let synced = template::sync_template(&existing, &known, Utc::now());
    if !synced.added.is_empty() {
        atomic_write(&template_path, &synced.text)?;
    }

    Ok(CommitOutcome {
        write,
        template_added: synced.added,
    })
}

/// Render the template for one phase (no ancestor walk) in preview mode and
/// write it to the local target file.
pub fn pull(store: &dyn SecretStore, phase: &Phase, paths: &EnvPaths) -> Result<RenderOutcome, SyncError> {
    let chain = vec![phase.clone()];
    render_to_target(store, phase, chain, RenderMode::Preview, paths)
}

/// Render the template against the full ancestor chain in strict mode and
/// write it to the local target file.
///
/// Any unresolved required key aborts before the file is touched. When the
/// store declares no inheritance graph, the conventional
/// `prod → stage → dev → local` hierarchy applies.
pub fn build(store: &dyn SecretStore, phase: &Phase, paths: &EnvPaths) -> Result<RenderOutcome, SyncError> {
    let mut graph = store.inheritance_graph();
    if graph.is_empty() {
        graph = InheritanceGraph::default_hierarchy();
    }
    let chain = resolve_chain(phase, &graph);
    render_to_target(store, phase, chain, RenderMode::Strict, paths)
}

fn render_to_target(
    store: &dyn SecretStore,
    phase: &Phase,
    chain: Vec<Phase>,
    mode: RenderMode,
    paths: &EnvPaths,
) -> Result<RenderOutcome, SyncError> {
    let maps = fetch_snapshot(store, &chain);
    let template = files::ensure_template(&paths.template_path())?;

    let ctx = LookupContext::new(phase.clone(), chain.clone(), maps);
    let rendered = Renderer::new(ctx).render(&template, mode)?;

    let target = paths.target_path();
    atomic_write(&target, &rendered)?;

    tracing::debug!("rendered phase '{phase}' via chain of {}", chain.len());
    Ok(RenderOutcome {
        phase: phase.clone(),
        chain,
        path: target,
    })
}

/// Fetch every mapping a render over `chain` can touch (chain + `common`),
/// once, before resolution begins.
fn fetch_snapshot(store: &dyn SecretStore, chain: &[Phase]) -> PhaseMaps {
    snapshot_phases(chain)
        .into_iter()
        .map(|phase| {
            let map = store.read(&phase);
            (phase, map)
        })
        .collect()
}

/// Resolve the operative phase: explicit override first, then the target
/// filename convention.
pub fn effective_phase(explicit: Option<&str>, paths: &EnvPaths) -> Result<Phase, SyncError> {
    if let Some(name) = explicit {
        return Ok(Phase::from(name));
    }
    paths.implied_phase().ok_or_else(|| SyncError::UnknownPhase {
        target: paths.target.clone(),
    })
}
