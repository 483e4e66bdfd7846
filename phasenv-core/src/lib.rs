//! phasenv core library — domain types, inheritance resolution, env
//! serialization.
//!
//! Public API surface:
//! - [`types`] — [`Phase`], [`EnvMap`], [`InheritanceGraph`]
//! - [`resolve`] — lookup-chain computation and key resolution
//! - [`serde_env`] — `.env`-format serializer

pub mod resolve;
pub mod serde_env;
pub mod types;

pub use resolve::{lookup_common, lookup_plain, resolve_chain, resolve_key, PhaseMaps, Resolved};
pub use serde_env::{DotEnvSerializer, EnvSerializer};
pub use types::{filter_empty, EnvMap, InheritanceGraph, Phase, COMMON_PHASE};
