//! Template synchronizer — appends default lookup expressions for keys that
//! exist in the store but are not yet declared in the template.
//!
//! Append-only by contract: existing lines are never rewritten or removed,
//! so manual edits to key expressions survive every sync.

use chrono::{DateTime, Utc};

use phasenv_core::{DotEnvSerializer, EnvMap, EnvSerializer};

/// Outcome of a template synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSync {
    /// Updated template text (identical to the input when nothing was added).
    pub text: String,
    /// Keys appended, in sorted order.
    pub added: Vec<String>,
}

/// Default lookup expression for a newly-declared key.
fn default_lookup(key: &str) -> String {
    format!("{{{{ load_inheritance(key=\"{key}\") }}}}")
}

/// Append declarations for every key in `known` missing from `existing`.
///
/// Declared keys are recovered by running the dotenv unserializer over the
/// template text — each `KEY=<expr>` line declares `KEY` no matter what the
/// expression is. New keys are appended sorted, under a single
/// generation-timestamp comment.
pub fn sync_template(existing: &str, known: &EnvMap, generated_at: DateTime<Utc>) -> TemplateSync {
    let declared = DotEnvSerializer.unserialize(existing);

    let new_table: EnvMap = known
        .keys()
        .filter(|key| !declared.contains_key(*key))
        .map(|key| (key.clone(), default_lookup(key)))
        .collect();

    if new_table.is_empty() {
        return TemplateSync {
            text: existing.to_owned(),
            added: Vec::new(),
        };
    }

    let comment = format!("generated at {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    let mut text = existing.to_owned();
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    for line in DotEnvSerializer.serialize(&new_table, &comment) {
        text.push_str(&line);
        text.push('\n');
    }

    TemplateSync {
        text,
        added: new_table.into_keys().collect(),
    }
}
