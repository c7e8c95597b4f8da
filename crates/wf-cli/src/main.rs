//! CLI frontend for the Wayfarer session controller.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "wf",
    about = "Wayfarer: play text adventures with undo, save slots, and timed hints",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where save slots live.
#[derive(Args)]
struct StoreArgs {
    /// JSON file holding save slots and the last command
    #[arg(long, default_value = ".wayfarer/saves.json")]
    store: PathBuf,

    /// Key namespace for save slots
    #[arg(long, default_value = "wayfarer_save")]
    namespace: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a scripted story interactively over stdin
    Play {
        /// Story script (JSON)
        script: PathBuf,

        #[command(flatten)]
        store: StoreArgs,

        /// Maximum number of remembered commands
        #[arg(long, default_value = "100")]
        history_capacity: usize,

        /// Maximum engine steps per turn
        #[arg(long, default_value = "100")]
        drain_ceiling: usize,
    },

    /// List save slots
    Slots {
        /// Delete this slot instead of listing
        #[arg(short, long)]
        delete: Option<String>,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Print the most recently submitted command
    LastCommand {
        #[command(flatten)]
        store: StoreArgs,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            script,
            store,
            history_capacity,
            drain_ceiling,
        } => commands::play::run(
            &script,
            &store.store,
            &store.namespace,
            history_capacity,
            drain_ceiling,
        ),
        Commands::Slots { delete, store } => {
            commands::slots::run(&store.store, &store.namespace, delete.as_deref())
        }
        Commands::LastCommand { store } => {
            commands::slots::last_command(&store.store, &store.namespace)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
