//! State file commands.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};
use prism_engine::{ChainOrder, EngineConfig, ParamStore, PersistedState, create};

#[derive(Args)]
pub struct StateArgs {
    #[command(subcommand)]
    command: StateCommand,
}

#[derive(Subcommand)]
enum StateCommand {
    /// Write a state file holding every default
    Init {
        /// Output file
        file: PathBuf,
    },
    /// Validate a state file and print its contents
    Show {
        /// State file
        file: PathBuf,
    },
}

pub fn run(args: StateArgs) -> anyhow::Result<()> {
    match args.command {
        StateCommand::Init { file } => init(&file),
        StateCommand::Show { file } => show(&file),
    }
}

fn init(file: &Path) -> anyhow::Result<()> {
    let (_processor, controller) = create(EngineConfig::default())?;
    let bytes = controller.save_state()?;
    std::fs::write(file, bytes).with_context(|| format!("failed to write {}", file.display()))?;
    println!("Wrote default state to {}", file.display());
    Ok(())
}

fn show(file: &Path) -> anyhow::Result<()> {
    let bytes = std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let state = PersistedState::from_bytes(&bytes).with_context(|| format!("invalid state file {}", file.display()))?;

    let order = match &state.order {
        Some(indices) => ChainOrder::try_from_indices(indices).context("invalid order")?,
        None => ChainOrder::identity(),
    };

    println!("Version: {}", state.version);
    println!("Order:   {order}");
    println!("Tab:     {}", state.resolved_tab());

    let store = ParamStore::with_layout()?;
    let changed: Vec<_> = state.non_default_params(&store).collect();
    if changed.is_empty() {
        println!("All parameters at defaults");
    } else {
        println!("Changed parameters:");
        for (id, value) in changed {
            println!("  {id:<22} {value}");
        }
    }

    let unknown: Vec<_> = state
        .params
        .keys()
        .filter(|id| store.lookup(id).is_none())
        .collect();
    for id in unknown {
        tracing::warn!(id = %id, "unknown parameter in state file, ignored on load");
    }
    Ok(())
}
