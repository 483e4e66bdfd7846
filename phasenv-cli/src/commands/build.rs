//! `phasenv build` — strict-render the template against the full chain.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use phasenv_sync::pipeline;

use super::{format_chain, FileArgs, StoreArgs};

/// Arguments for `phasenv build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub file: FileArgs,
}

impl BuildArgs {
    pub fn run(self) -> Result<()> {
        let store = self.store.open()?;
        let phase = self.file.phase()?;
        let paths = self.file.paths();

        let outcome = pipeline::build(&store, &phase, &paths)
            .with_context(|| format!("build failed for phase '{phase}'"))?;

        println!(
            "{} built '{}' for phase '{}'",
            "✓".green(),
            outcome.path.display(),
            outcome.phase,
        );
        println!("  chain: {}", format_chain(&outcome.chain));
        Ok(())
    }
}
