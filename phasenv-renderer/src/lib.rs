//! # phasenv-renderer
//!
//! Tera-based template renderer exposing three lookup primitives to the
//! template text — `load(key="…")`, `load_common(key="…")` and
//! `load_inheritance(key="…")` — backed by the phase-inheritance resolver.
//!
//! ## Usage
//!
//! ```rust
//! use phasenv_core::{EnvMap, Phase};
//! use phasenv_renderer::{LookupContext, RenderMode, Renderer};
//!
//! let mut dev = EnvMap::new();
//! dev.insert("PORT".into(), "8080".into());
//! let phase = Phase::from("dev");
//! let ctx = LookupContext::new(
//!     phase.clone(),
//!     vec![phase.clone()],
//!     [(phase, dev)].into_iter().collect(),
//! );
//! let out = Renderer::new(ctx)
//!     .render("PORT={{ load(key=\"PORT\") }}", RenderMode::Preview)
//!     .unwrap();
//! assert_eq!(out, "PORT=8080");
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::{snapshot_phases, LookupContext};
pub use engine::{RenderMode, Renderer};
pub use error::{Primitive, RenderError};
