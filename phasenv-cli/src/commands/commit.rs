//! `phasenv commit` — store the local env file and sync the template.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use phasenv_sync::pipeline;

use super::{FileArgs, StoreArgs};

/// Arguments for `phasenv commit`.
#[derive(Args, Debug)]
pub struct CommitArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub file: FileArgs,
}

impl CommitArgs {
    pub fn run(self) -> Result<()> {
        let store = self.store.open()?;
        let phase = self.file.phase()?;
        let paths = self.file.paths();

        let outcome = pipeline::commit(&store, &phase, &paths)
            .with_context(|| format!("commit failed for phase '{phase}'"))?;

        println!(
            "{} committed '{}' to phase '{}' ({} keys written, {} empty skipped)",
            "✓".green(),
            self.file.target,
            outcome.write.phase,
            outcome.write.written,
            outcome.write.skipped_empty,
        );
        if outcome.template_added.is_empty() {
            println!("  template already declares every key");
        } else {
            println!("  new keys declared in '{}':", self.file.template);
            for key in &outcome.template_added {
                println!("  {} {}", "+".green(), key);
            }
        }
        Ok(())
    }
}
