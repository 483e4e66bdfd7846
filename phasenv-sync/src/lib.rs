//! # phasenv-sync
//!
//! Template synchronization, atomic file writes, and the four
//! phase-transition pipelines (`commit`, `push`, `pull`, `build`) composing
//! serializer, store, resolver and renderer.

pub mod error;
pub mod files;
pub mod pipeline;
pub mod template;
pub mod writer;

pub use error::SyncError;
pub use pipeline::{build, commit, pull, push, CommitOutcome, EnvPaths, RenderOutcome, StoreWrite};
pub use template::{sync_template, TemplateSync};
