//! Line-oriented serialization between [`EnvMap`] and `.env`-style text.
//!
//! The format is pluggable behind [`EnvSerializer`]; only the dotenv flavor
//! is implemented today.

use crate::types::EnvMap;

/// Two-way conversion between a flat mapping and a textual format.
pub trait EnvSerializer {
    /// Emit one line per entry, preceded by an optional comment header.
    fn serialize(&self, table: &EnvMap, comment: &str) -> Vec<String>;

    /// Parse text back into a mapping. Never fails — unparseable lines are
    /// skipped.
    fn unserialize(&self, content: &str) -> EnvMap;
}

/// `KEY=VALUE` lines; blank lines and `#` comments are ignored on read.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotEnvSerializer;

impl EnvSerializer for DotEnvSerializer {
    fn serialize(&self, table: &EnvMap, comment: &str) -> Vec<String> {
        let mut lines = Vec::with_capacity(table.len() + 2);
        if !comment.is_empty() {
            lines.push(String::new());
            lines.push(format!("# {comment}"));
        }
        for (key, value) in table {
            lines.push(format!("{key}={value}"));
        }
        lines
    }

    fn unserialize(&self, content: &str) -> EnvMap {
        let mut table = EnvMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            // Split on the first '='; later '=' chars belong to the value.
            if let Some((key, value)) = line.split_once('=') {
                table.insert(key.to_owned(), value.to_owned());
            }
        }
        table
    }
}
