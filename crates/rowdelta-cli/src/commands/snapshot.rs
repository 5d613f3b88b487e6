//! Snapshot command

use clap::Args;
use rowdelta_store::{capture_table, db};
use std::path::PathBuf;

use super::load_settings;

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    /// Database file to read
    #[arg(long)]
    pub db: PathBuf,

    /// Table to capture
    #[arg(long)]
    pub table: String,

    /// Key columns overriding the declared primary key
    #[arg(long = "pk")]
    pub primary_key: Vec<String>,

    /// TOML file with letter-case settings
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn execute(args: SnapshotArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_settings(args.config.as_deref())?;
    let conn = db::open_read_only(&args.db)?;
    let snapshot = capture_table(&conn, &args.table, &settings, &args.primary_key)?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
