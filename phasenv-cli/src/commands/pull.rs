//! `phasenv pull` — preview-render the template for one phase.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use phasenv_sync::pipeline;

use super::{FileArgs, StoreArgs};

/// Arguments for `phasenv pull`.
#[derive(Args, Debug)]
pub struct PullArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub file: FileArgs,
}

impl PullArgs {
    pub fn run(self) -> Result<()> {
        let store = self.store.open()?;
        let phase = self.file.phase()?;
        let paths = self.file.paths();

        let outcome = pipeline::pull(&store, &phase, &paths)
            .with_context(|| format!("pull failed for phase '{phase}'"))?;

        println!(
            "{} pulled phase '{}' into '{}'",
            "✓".green(),
            outcome.phase,
            outcome.path.display(),
        );
        Ok(())
    }
}
