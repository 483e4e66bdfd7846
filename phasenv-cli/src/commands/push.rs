//! `phasenv push` — store the local env file without touching the template.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use phasenv_sync::pipeline;

use super::{FileArgs, StoreArgs};

/// Arguments for `phasenv push`.
#[derive(Args, Debug)]
pub struct PushArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub file: FileArgs,
}

impl PushArgs {
    pub fn run(self) -> Result<()> {
        let store = self.store.open()?;
        let phase = self.file.phase()?;
        let paths = self.file.paths();

        let write = pipeline::push(&store, &phase, &paths)
            .with_context(|| format!("push failed for phase '{phase}'"))?;

        println!(
            "{} pushed '{}' to phase '{}' ({} keys written, {} empty skipped)",
            "✓".green(),
            self.file.target,
            write.phase,
            write.written,
            write.skipped_empty,
        );
        Ok(())
    }
}
