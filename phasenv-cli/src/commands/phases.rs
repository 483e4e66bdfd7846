//! `phasenv phases` — store phase listing with key counts and parents.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use phasenv_core::Phase;
use phasenv_store::SecretStore;

use super::StoreArgs;

/// Arguments for `phasenv phases`.
#[derive(Args, Debug)]
pub struct PhasesArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct PhaseRow {
    #[tabled(rename = "phase")]
    phase: String,
    #[tabled(rename = "keys")]
    keys: usize,
    #[tabled(rename = "parents")]
    parents: String,
}

#[derive(Serialize)]
struct PhaseJson {
    phase: String,
    keys: usize,
    parents: Vec<String>,
}

impl PhasesArgs {
    pub fn run(self) -> Result<()> {
        let store = self.store.open()?;
        let graph = store.inheritance_graph();
        let phases = store.list_phases();

        if phases.is_empty() {
            println!(
                "No phases found for project '{}'. Run `phasenv commit` first.",
                self.store.project
            );
            return Ok(());
        }

        if self.json {
            let entries: Vec<PhaseJson> = phases
                .iter()
                .map(|name| PhaseJson {
                    phase: name.clone(),
                    keys: store.read(&Phase::from(name.as_str())).len(),
                    parents: graph.parents(name).to_vec(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        let rows: Vec<PhaseRow> = phases
            .iter()
            .map(|name| {
                let parents = graph.parents(name);
                PhaseRow {
                    phase: name.clone(),
                    keys: store.read(&Phase::from(name.as_str())).len(),
                    parents: if parents.is_empty() {
                        "-".to_owned()
                    } else {
                        parents.join(", ")
                    },
                }
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}
