//! Diff command

use clap::{Args, ValueEnum};
use rowdelta_core::diff::{compute_changes, render_changes, Changes};
use rowdelta_core::LetterCaseSettings;
use rowdelta_store::source::{list_tables, resolve_table_name};
use rowdelta_store::{capture_request, capture_table, db};
use rusqlite::Connection;
use std::path::PathBuf;

use super::load_settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Database at the start point
    #[arg(long)]
    pub before: PathBuf,

    /// Database at the end point
    #[arg(long)]
    pub after: PathBuf,

    /// Tables to compare (all tables of the before database when omitted)
    #[arg(long = "table", conflicts_with = "query")]
    pub tables: Vec<String>,

    /// Compare the result of a query instead of tables
    #[arg(long)]
    pub query: Option<String>,

    /// Key columns overriding the declared primary key
    #[arg(long = "pk")]
    pub primary_key: Vec<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// TOML file with letter-case settings
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn execute(args: DiffArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_settings(args.config.as_deref())?;
    let before = db::open_read_only(&args.before)?;
    let after = db::open_read_only(&args.after)?;

    let changes = match &args.query {
        Some(sql) => {
            let b = capture_request(&before, sql, &settings, &args.primary_key)?;
            let a = capture_request(&after, sql, &settings, &args.primary_key)?;
            compute_changes(&b, &a)?
        }
        None => diff_tables(&before, &after, &args.tables, &args.primary_key, &settings)?,
    };

    match args.format {
        OutputFormat::Text => print!("{}", render_changes(&changes)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&changes)?),
    }
    Ok(())
}

fn diff_tables(
    before: &Connection,
    after: &Connection,
    tables: &[String],
    primary_key: &[String],
    settings: &LetterCaseSettings,
) -> Result<Changes, Box<dyn std::error::Error>> {
    let mut names = if tables.is_empty() {
        list_tables(before)?
    } else {
        tables
            .iter()
            .map(|t| resolve_table_name(before, t, settings))
            .collect::<Result<Vec<_>, _>>()?
    };
    let table_case = settings.table();
    names.sort_by(|a, b| table_case.compare(Some(a.as_str()), Some(b.as_str())));
    names.dedup_by(|a, b| table_case.eq_str(a, b));

    let mut parts = Vec::with_capacity(names.len());
    for name in &names {
        let b = capture_table(before, name, settings, primary_key)?;
        let a = capture_table(after, name, settings, primary_key)?;
        parts.push(compute_changes(&b, &a)?);
    }
    Ok(Changes::concat(parts, *settings))
}
