use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use location_sync::config::AppConfig;
use location_sync::logging::init_logging;
use location_sync::Database;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Extra configuration file, layered over config/default and config/local
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database path, overrides configuration
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a location CSV file into the location table
    Sync {
        /// CSV file with criteria_id,name,canonical_name,parent_id,country_code,target_type,status
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one location by criteria id
    Show {
        /// Criteria id to look up
        criteria_id: i64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Initialize logging
    let level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let _log_guard = init_logging(
        level,
        &config.logging.format,
        config.logging.file_path.as_deref().map(Path::new),
    )?;

    info!("Starting location-sync");

    let db_path = cli.database.clone().unwrap_or_else(|| config.database_path());
    let mut db = Database::open(&db_path, config.busy_timeout())
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;

    match cli.command {
        Commands::Sync { file, json } => {
            let file = config.resolve_csv_path(file)?;
            sync_file(&mut db, &file, json)?;
        }
        Commands::Show { criteria_id } => show_location(&db, criteria_id)?,
    }

    Ok(())
}

/// Run one sync and print its report
#[allow(clippy::print_stdout)]
fn sync_file(db: &mut Database, file: &Path, json: bool) -> Result<()> {
    let report = db
        .sync_file(file)
        .with_context(|| format!("Failed to sync locations from {}", file.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    Ok(())
}

/// Print one location, or say it is absent
#[allow(clippy::print_stdout)]
fn show_location(db: &Database, criteria_id: i64) -> Result<()> {
    match db.get_location(criteria_id)? {
        Some(location) => println!("{}", serde_json::to_string_pretty(&location)?),
        None => println!("No location with criteria_id {criteria_id}"),
    }

    Ok(())
}
