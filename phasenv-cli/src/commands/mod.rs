//! Subcommand implementations and the flag groups they share.

pub mod build;
pub mod commit;
pub mod phases;
pub mod pull;
pub mod push;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use phasenv_core::Phase;
use phasenv_store::VaultStore;
use phasenv_sync::{pipeline, EnvPaths};

// ---------------------------------------------------------------------------
// Shared flag groups
// ---------------------------------------------------------------------------

/// Secret-store connection flags shared by every subcommand.
#[derive(Args, Debug)]
pub struct StoreArgs {
    /// Project name used as the secret path prefix.
    #[arg(long, short = 'p', visible_alias = "pjt")]
    pub project: String,

    /// Vault address.
    #[arg(long, env = "VAULT_ADDR", default_value = "http://localhost:8200")]
    pub vault_addr: String,

    /// Vault token. Defaults to $VAULT_TOKEN, then ~/.vault-token.
    #[arg(long, env = "VAULT_TOKEN", hide_env_values = true)]
    pub vault_token: Option<String>,

    /// KV v2 mount point.
    #[arg(long, default_value = "secret")]
    pub mount: String,
}

impl StoreArgs {
    pub fn open(&self) -> Result<VaultStore> {
        let token = self.vault_token.clone().or_else(token_file).context(
            "no Vault token; pass --vault-token, set VAULT_TOKEN, or run `vault login` so ~/.vault-token exists",
        )?;
        Ok(VaultStore::new(
            &self.vault_addr,
            &token,
            &self.mount,
            &self.project,
        ))
    }
}

/// `~/.vault-token`, as written by `vault login`.
fn token_file() -> Option<String> {
    let path = dirs::home_dir()?.join(".vault-token");
    let token = std::fs::read_to_string(path).ok()?;
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_owned())
}

/// Local file flags shared by the file-touching subcommands.
#[derive(Args, Debug)]
pub struct FileArgs {
    /// Target phase. Defaults from the target filename
    /// (.env → local, .env.<name> → <name>).
    #[arg(long)]
    pub phase: Option<String>,

    /// Root directory holding the env files.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Local env file to read (commit/push) or write (pull/build).
    #[arg(long, default_value = ".env")]
    pub target: String,

    /// Template file driving rendering.
    #[arg(long, default_value = ".env.template")]
    pub template: String,
}

impl FileArgs {
    pub fn paths(&self) -> EnvPaths {
        EnvPaths::new(&self.root, &self.target, &self.template)
    }

    pub fn phase(&self) -> Result<Phase> {
        Ok(pipeline::effective_phase(
            self.phase.as_deref(),
            &self.paths(),
        )?)
    }
}

/// `prod → stage → dev` style chain display for pull/build output.
pub(crate) fn format_chain(chain: &[Phase]) -> String {
    chain
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" → ")
}
