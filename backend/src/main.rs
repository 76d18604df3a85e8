//! Main entry point for the Foodgram backend.
//!
//! Parses the command line, initializes logging and either runs the server or
//! one of the maintenance commands (migrations, reference data import, admin
//! promotion).

use std::{fs::File, path::PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use foodgram_backend::{
    config::Config,
    database::{self, models::ROLE_ADMIN, queries},
    serve,
    services::import,
    utils::logger::init_logger,
};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "foodgram")]
#[command(about = "Recipe sharing backend")]
struct Cli {
    #[arg(long, global = true, help = "Emit logs as JSON")]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Apply database migrations and exit.
    Migrate,
    /// Load `name,measurement_unit` rows from a headerless CSV file.
    ImportIngredients { path: PathBuf },
    /// Load `name,color,slug` rows from a headerless CSV file.
    ImportTags { path: PathBuf },
    /// Give the user with this email the admin role.
    GrantAdmin { email: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.json_logs);

    let config = Config::load()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await?,
        Command::Migrate => {
            connect(&config).await?;
        }
        Command::ImportIngredients { path } => {
            let pool = connect(&config).await?;
            let file = File::open(&path).with_context(|| format!("cannot open {}", path.display()))?;
            let summary = import::import_ingredients(&pool, file).await?;
            info!(read = summary.read, inserted = summary.inserted, "done");
        }
        Command::ImportTags { path } => {
            let pool = connect(&config).await?;
            let file = File::open(&path).with_context(|| format!("cannot open {}", path.display()))?;
            let summary = import::import_tags(&pool, file).await?;
            info!(read = summary.read, "done");
        }
        Command::GrantAdmin { email } => {
            let pool = connect(&config).await?;
            if queries::set_role_by_email(&pool, &email, ROLE_ADMIN).await? == 0 {
                bail!("no user with email {email}");
            }
            info!("{email} is now an admin");
        }
    }

    Ok(())
}

async fn connect(config: &Config) -> anyhow::Result<sqlx::SqlitePool> {
    let pool = database::connect(&config.database_url, config.db_max_connections).await?;
    database::migrate(&pool).await?;
    Ok(pool)
}
