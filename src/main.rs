use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use sqlx::postgres::{PgPool, PgPoolOptions};

use groupscholar_dashboard_metrics::config::Config;
use groupscholar_dashboard_metrics::dashboard::{self, DashboardOptions, Role};
use groupscholar_dashboard_metrics::metrics::classify_tier;
use groupscholar_dashboard_metrics::snapshot::Snapshot;
use groupscholar_dashboard_metrics::{db, logging, report};

#[derive(Parser)]
#[command(name = "dashboard-metrics")]
#[command(about = "Role dashboards for Group Scholar school records", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Import records from a JSON snapshot or a directory of CSV files
    #[command(group(
        ArgGroup::new("source")
            .args(["json", "csv_dir"])
            .required(true)
            .multiple(false)
    ))]
    Import {
        #[arg(long)]
        json: Option<PathBuf>,
        #[arg(long)]
        csv_dir: Option<PathBuf>,
    },
    /// Compute the dashboard a role lands on
    #[command(group(
        ArgGroup::new("source")
            .args(["json", "csv_dir"])
            .multiple(false)
    ))]
    Dashboard {
        #[arg(long)]
        role: Role,
        /// Read records from a JSON snapshot instead of Postgres
        #[arg(long)]
        json: Option<PathBuf>,
        /// Read records from a directory of CSV files instead of Postgres
        #[arg(long)]
        csv_dir: Option<PathBuf>,
        /// Restrict records to one student
        #[arg(long)]
        student: Option<String>,
        /// Anchor date for trends (defaults to today, UTC)
        #[arg(long)]
        today: Option<NaiveDate>,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Classify a primary and secondary score into a performance tier
    Tier {
        #[arg(allow_negative_numbers = true)]
        primary: f64,
        #[arg(allow_negative_numbers = true)]
        secondary: f64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    logging::init(&config.logging);

    match cli.command {
        Commands::InitDb => {
            let pool = connect(&config).await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let pool = connect(&config).await?;
            let inserted = db::seed(&pool).await?;
            println!("Seed data inserted ({inserted} records).");
        }
        Commands::Import { json, csv_dir } => {
            let (snapshot, origin) = load_file_snapshot(json.as_deref(), csv_dir.as_deref())?
                .context("an import source is required")?;
            let pool = connect(&config).await?;
            let stored = db::store_snapshot(&pool, &snapshot).await?;
            println!("Imported {stored} records from {}.", origin.display());
        }
        Commands::Dashboard {
            role,
            json,
            csv_dir,
            student,
            today,
            format,
        } => {
            let mut snapshot = match load_file_snapshot(json.as_deref(), csv_dir.as_deref())? {
                Some((snapshot, _)) => snapshot,
                None => {
                    let pool = connect(&config).await?;
                    db::fetch_snapshot(&pool).await?
                }
            };
            if let Some(student) = student.as_deref() {
                snapshot = snapshot.for_student(student);
            }

            let options = DashboardOptions::from_config(&config, today);
            let dashboard = dashboard::build(role, &snapshot, &options);
            match format {
                Format::Text => print!("{}", report::render_text(&dashboard, options.today)),
                Format::Json => println!("{}", serde_json::to_string_pretty(&dashboard)?),
            }
        }
        Commands::Tier { primary, secondary } => {
            println!("{}", classify_tier(primary, secondary, &config.tiers));
        }
    }

    Ok(())
}

async fn connect(config: &Config) -> anyhow::Result<PgPool> {
    let database_url = config.database_url()?;
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")
}

fn load_file_snapshot<'a>(
    json: Option<&'a Path>,
    csv_dir: Option<&'a Path>,
) -> anyhow::Result<Option<(Snapshot, &'a Path)>> {
    if let Some(path) = json {
        let snapshot = Snapshot::from_json_path(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        return Ok(Some((snapshot, path)));
    }
    if let Some(dir) = csv_dir {
        let snapshot = Snapshot::from_csv_dir(dir)
            .with_context(|| format!("failed to read {}", dir.display()))?;
        return Ok(Some((snapshot, dir)));
    }
    Ok(None)
}
