use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fedtax_data::ScheduleLoader;
use fedtax_db_sqlite::SqliteRepository;

/// Load IRS rate-schedule data from a CSV file into the database.
///
/// The CSV columns are:
/// - tax_year: the tax year (e.g. 2025)
/// - schedule: the IRS schedule code (X, Y-1, Y-2, Z)
/// - min_income: the bracket floor
/// - max_income: the bracket ceiling (empty for the top bracket)
/// - base_tax: tax owed at the bracket floor
/// - rate: the marginal rate as a decimal (e.g. 0.22)
#[derive(Parser, Debug)]
#[command(name = "fedtax-data-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing rate-schedule data
    #[arg(short, long)]
    file: PathBuf,

    /// SQLite database URL (e.g. sqlite:fedtax.db?mode=rwc to create if missing)
    #[arg(short, long, default_value = "sqlite:fedtax.db?mode=rwc")]
    database: String,

    /// Run database migrations before loading data
    #[arg(short, long, default_value_t = false)]
    migrate: bool,

    /// Run seed files from the specified directory after migrations
    #[arg(short, long)]
    seeds: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let repo = SqliteRepository::new(&args.database)
        .await
        .with_context(|| format!("Failed to connect to database: {}", args.database))?;

    if args.migrate {
        info!("running migrations");
        repo.run_migrations()
            .await
            .context("Failed to run migrations")?;
    }

    if let Some(seeds_dir) = &args.seeds {
        info!(dir = %seeds_dir.display(), "running seeds");
        repo.run_seeds(seeds_dir)
            .await
            .with_context(|| format!("Failed to run seeds from: {}", seeds_dir.display()))?;
    }

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = ScheduleLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;
    info!(records = records.len(), file = %args.file.display(), "parsed rate schedules");

    let inserted = ScheduleLoader::load(&repo, &records)
        .await
        .context("Failed to load rate schedules into database")?;

    info!(inserted, "rate schedules loaded");

    Ok(())
}
