//! rowdelta CLI
//!
//! Capture and diff SQLite databases from the shell

use clap::{Parser, Subcommand};
use rowdelta_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "rowdelta")]
#[command(about = "rowdelta - row-level change detection for SQLite", long_about = None)]
struct Cli {
    /// Emit JSON log lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare two databases and list the row changes
    Diff(commands::diff::DiffArgs),
    /// Print a captured table as JSON
    Snapshot(commands::snapshot::SnapshotArgs),
}

fn main() {
    let cli = Cli::parse();

    init(if cli.json_logs {
        Profile::Production
    } else {
        Profile::Development
    });

    let result = match cli.command {
        Commands::Diff(args) => commands::diff::execute(args),
        Commands::Snapshot(args) => commands::snapshot::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
