//! Schema migration CLI.
//!
//! Applies pending migrations, rolls back the most recent one, or lists
//! what has been applied.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "stockroom-migrate")]
#[command(about = "Apply or roll back the stockroom database schema")]
#[command(version)]
struct Cli {
    /// Database connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply every pending migration
    Migrate,
    /// Undo the most recently applied migration
    Rollback,
    /// Show applied and pending migrations
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockroom_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let pool = stockroom_db::create_pool(&cli.database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Migrate => {
            let applied = stockroom_db::migrations::migrate(&pool)
                .await
                .context("Migration failed")?;
            if applied.is_empty() {
                println!("Schema is up to date");
            }
            for version in applied {
                println!("Applied {version}");
            }
        }
        Commands::Rollback => {
            let undone = stockroom_db::migrations::rollback_last(&pool)
                .await
                .context("Rollback failed")?;
            match undone {
                Some(m) => println!("Rolled back {} {}", m.version, m.description),
                None => println!("No migrations to roll back"),
            }
        }
        Commands::Status => {
            let status = stockroom_db::migrations::status(&pool)
                .await
                .context("Failed to read migration ledger")?;
            for m in status {
                let state = if m.applied { "applied" } else { "pending" };
                println!("{:>16}  {:<8}  {}", m.version, state, m.description);
            }
        }
    }

    pool.close().await;
    Ok(())
}
