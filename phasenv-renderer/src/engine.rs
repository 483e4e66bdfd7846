//! Rendering engine — a fresh [`tera::Tera`] per render with the three
//! lookup primitives registered as template functions.
//!
//! Both render modes share the resolver's `Option` output: preview maps a
//! miss to the empty string, strict maps a miss on a referenced key to
//! [`RenderError::UnresolvedKey`]. The lookup logic itself is identical.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tera::{Tera, Value};

use phasenv_core::resolve;

use crate::context::LookupContext;
use crate::error::{Primitive, RenderError};

const TEMPLATE_NAME: &str = "phasenv";

/// How lookup misses are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Misses degrade to the empty string; rendering never fails on them.
    /// Used by `pull`.
    Preview,
    /// Misses on referenced keys abort the render. Used by `build`. Resolved
    /// `load_inheritance` values carry a source-phase comment for audit
    /// traceability (cosmetic — never fed back into the store).
    Strict,
}

/// First unresolved (key, primitive) observed by a strict render, recorded by
/// the registered functions so the engine can surface a typed error instead
/// of tera's stringly one.
type FailureSlot = Arc<Mutex<Option<(String, Primitive)>>>;

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// One-shot renderer over a pre-fetched [`LookupContext`].
pub struct Renderer {
    ctx: Arc<LookupContext>,
}

impl Renderer {
    pub fn new(ctx: LookupContext) -> Self {
        Self { ctx: Arc::new(ctx) }
    }

    /// Render `template` under `mode`.
    ///
    /// Syntax errors and bare `{{ VAR }}` references fail in both modes;
    /// only lookup-primitive misses are mode-dependent.
    pub fn render(&self, template: &str, mode: RenderMode) -> Result<String, RenderError> {
        let failure: FailureSlot = Arc::new(Mutex::new(None));

        let mut tera = Tera::default();
        tera.register_function("load", load_fn(self.ctx.clone(), mode, failure.clone()));
        tera.register_function(
            "load_common",
            load_common_fn(self.ctx.clone(), mode, failure.clone()),
        );
        tera.register_function(
            "load_inheritance",
            load_inheritance_fn(self.ctx.clone(), mode, failure.clone()),
        );

        tera.add_raw_template(TEMPLATE_NAME, template)?;
        match tera.render(TEMPLATE_NAME, &tera::Context::new()) {
            Ok(rendered) => Ok(rendered),
            Err(err) => {
                let recorded = failure.lock().expect("failure slot poisoned").take();
                match recorded {
                    Some((key, primitive)) => Err(RenderError::UnresolvedKey { key, primitive }),
                    None => Err(RenderError::Template(err)),
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Registered functions
// ---------------------------------------------------------------------------

fn key_arg(args: &HashMap<String, Value>) -> tera::Result<String> {
    match args.get("key") {
        Some(Value::String(key)) => Ok(key.clone()),
        Some(other) => Err(tera::Error::msg(format!(
            "`key` argument must be a string, got {other}"
        ))),
        None => Err(tera::Error::msg("missing required `key` argument")),
    }
}

fn miss(
    failure: &FailureSlot,
    primitive: Primitive,
    key: &str,
    mode: RenderMode,
) -> tera::Result<Value> {
    match mode {
        RenderMode::Preview => Ok(Value::String(String::new())),
        RenderMode::Strict => {
            let mut slot = failure.lock().expect("failure slot poisoned");
            if slot.is_none() {
                *slot = Some((key.to_owned(), primitive));
            }
            Err(tera::Error::msg(format!(
                "unresolved required key '{key}' ({primitive})"
            )))
        }
    }
}

fn load_fn(
    ctx: Arc<LookupContext>,
    mode: RenderMode,
    failure: FailureSlot,
) -> impl tera::Function {
    move |args: &HashMap<String, Value>| {
        let key = key_arg(args)?;
        match resolve::lookup_plain(&key, &ctx.phase, &ctx.maps) {
            Some(value) => Ok(Value::String(value)),
            None => miss(&failure, Primitive::Load, &key, mode),
        }
    }
}

fn load_common_fn(
    ctx: Arc<LookupContext>,
    mode: RenderMode,
    failure: FailureSlot,
) -> impl tera::Function {
    move |args: &HashMap<String, Value>| {
        let key = key_arg(args)?;
        match resolve::lookup_common(&key, &ctx.maps) {
            Some(value) => Ok(Value::String(value)),
            None => miss(&failure, Primitive::LoadCommon, &key, mode),
        }
    }
}

fn load_inheritance_fn(
    ctx: Arc<LookupContext>,
    mode: RenderMode,
    failure: FailureSlot,
) -> impl tera::Function {
    move |args: &HashMap<String, Value>| {
        let key = key_arg(args)?;
        match resolve::resolve_key(&key, &ctx.chain, &ctx.maps) {
            Some(resolved) => {
                let rendered = match mode {
                    RenderMode::Strict => {
                        format!("{}\t\t# From '{}'", resolved.value, resolved.source)
                    }
                    RenderMode::Preview => resolved.value,
                };
                Ok(Value::String(rendered))
            }
            None => miss(&failure, Primitive::LoadInheritance, &key, mode),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use phasenv_core::{EnvMap, Phase, PhaseMaps};

    fn context(entries: &[(&str, &[(&str, &str)])], phase: &str, chain: &[&str]) -> LookupContext {
        let maps: PhaseMaps = entries
            .iter()
            .map(|(p, pairs)| {
                let map: EnvMap = pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();
                (Phase::from(*p), map)
            })
            .collect();
        LookupContext::new(
            Phase::from(phase),
            chain.iter().map(|p| Phase::from(*p)).collect(),
            maps,
        )
    }

    #[test]
    fn load_reads_requested_phase_only() {
        let ctx = context(
            &[("dev", &[("X", "d")]), ("local", &[("X", "l")])],
            "dev",
            &["dev", "local"],
        );
        let out = Renderer::new(ctx)
            .render(r#"{{ load(key="X") }}"#, RenderMode::Preview)
            .unwrap();
        assert_eq!(out, "d");
    }

    #[test]
    fn load_miss_is_empty_in_preview() {
        let ctx = context(&[("dev", &[])], "dev", &["dev"]);
        let out = Renderer::new(ctx)
            .render(r#"X={{ load(key="X") }}"#, RenderMode::Preview)
            .unwrap();
        assert_eq!(out, "X=");
    }

    #[test]
    fn load_miss_fails_strict_with_key_and_primitive() {
        let ctx = context(&[("dev", &[])], "dev", &["dev"]);
        let err = Renderer::new(ctx)
            .render(r#"{{ load(key="MISSING") }}"#, RenderMode::Strict)
            .unwrap_err();
        match err {
            RenderError::UnresolvedKey { key, primitive } => {
                assert_eq!(key, "MISSING");
                assert_eq!(primitive, Primitive::Load);
            }
            other => panic!("expected UnresolvedKey, got {other:?}"),
        }
    }

    #[test]
    fn load_common_ignores_chain() {
        let ctx = context(
            &[("common", &[("X", "c")]), ("dev", &[("X", "d")])],
            "dev",
            &["dev"],
        );
        let out = Renderer::new(ctx)
            .render(r#"{{ load_common(key="X") }}"#, RenderMode::Preview)
            .unwrap();
        assert_eq!(out, "c");
    }

    #[test]
    fn inheritance_walks_chain_in_preview_without_annotation() {
        let ctx = context(
            &[("dev", &[]), ("local", &[("X", "l")])],
            "dev",
            &["dev", "local"],
        );
        let out = Renderer::new(ctx)
            .render(r#"{{ load_inheritance(key="X") }}"#, RenderMode::Preview)
            .unwrap();
        assert_eq!(out, "l");
    }

    #[test]
    fn inheritance_annotates_source_phase_in_strict() {
        let ctx = context(
            &[("dev", &[]), ("local", &[("X", "l")])],
            "dev",
            &["dev", "local"],
        );
        let out = Renderer::new(ctx)
            .render(r#"X={{ load_inheritance(key="X") }}"#, RenderMode::Strict)
            .unwrap();
        assert_eq!(out, "X=l\t\t# From 'local'");
    }

    #[test]
    fn inheritance_miss_fails_strict() {
        let ctx = context(&[("dev", &[])], "dev", &["dev"]);
        let err = Renderer::new(ctx)
            .render(r#"{{ load_inheritance(key="NOPE") }}"#, RenderMode::Strict)
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::UnresolvedKey {
                primitive: Primitive::LoadInheritance,
                ..
            }
        ));
    }

    #[test]
    fn empty_value_counts_as_miss() {
        let ctx = context(&[("dev", &[("X", "")])], "dev", &["dev"]);
        let err = Renderer::new(ctx)
            .render(r#"{{ load(key="X") }}"#, RenderMode::Strict)
            .unwrap_err();
        assert!(matches!(err, RenderError::UnresolvedKey { .. }));
    }

    #[test]
    fn bare_variable_reference_is_a_template_error_even_in_preview() {
        let ctx = context(&[("dev", &[])], "dev", &["dev"]);
        let err = Renderer::new(ctx)
            .render("{{ UNDECLARED }}", RenderMode::Preview)
            .unwrap_err();
        assert!(matches!(err, RenderError::Template(_)));
    }

    #[test]
    fn syntax_error_is_fatal_in_both_modes() {
        for mode in [RenderMode::Preview, RenderMode::Strict] {
            let ctx = context(&[("dev", &[])], "dev", &["dev"]);
            let err = Renderer::new(ctx)
                .render("{{ load(key=", mode)
                .unwrap_err();
            assert!(matches!(err, RenderError::Template(_)));
        }
    }

    #[test]
    fn missing_key_argument_is_a_template_error_in_preview() {
        let ctx = context(&[("dev", &[])], "dev", &["dev"]);
        let err = Renderer::new(ctx)
            .render("{{ load() }}", RenderMode::Preview)
            .unwrap_err();
        assert!(matches!(err, RenderError::Template(_)));
    }

    #[test]
    fn literal_text_passes_through_unchanged() {
        let ctx = context(&[("dev", &[])], "dev", &["dev"]);
        let out = Renderer::new(ctx)
            .render("# comment line\nSTATIC=yes\n", RenderMode::Strict)
            .unwrap();
        assert_eq!(out, "# comment line\nSTATIC=yes\n");
    }
}
