//! phasenv — phase-aware environment configuration CLI.
//!
//! # Usage
//!
//! ```text
//! phasenv commit --project <name> [--phase <p>] [--root DIR] [--target FILE] [--template FILE]
//! phasenv push   --project <name> [--phase <p>] [...]
//! phasenv pull   --project <name> [--phase <p>] [...]
//! phasenv build  --project <name> [--phase <p>] [...]
//! phasenv phases --project <name> [--json]
//! ```
//!
//! Store connection flags (`--vault-addr`, `--vault-token`, `--mount`) apply
//! to every subcommand; token resolution falls back to `$VAULT_TOKEN`, then
//! `~/.vault-token`.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    build::BuildArgs, commit::CommitArgs, phases::PhasesArgs, pull::PullArgs, push::PushArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "phasenv",
    version,
    about = "Manage per-phase environment configuration backed by a Vault KV store",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store the local env file, then declare new keys in the template.
    Commit(CommitArgs),

    /// Store the local env file only (no template synchronization).
    Push(PushArgs),

    /// Render the template for one phase (no inheritance walk) into the
    /// local env file. Missing values render as empty.
    Pull(PullArgs),

    /// Render the template against the full inheritance chain. Missing
    /// required values abort the build.
    Build(BuildArgs),

    /// List phases present in the store with key counts and parents.
    Phases(PhasesArgs),
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Commit(args) => args.run(),
        Commands::Push(args) => args.run(),
        Commands::Pull(args) => args.run(),
        Commands::Build(args) => args.run(),
        Commands::Phases(args) => args.run(),
    }
}
