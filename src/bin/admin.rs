//! CLI administration tool for go-shortener.
//!
//! Inspects and maintains the PostgreSQL store without going through the
//! HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Look up a short key
//! cargo run --bin admin -- resolve Ab3dE9xZ
//!
//! # List the live links of a user
//! cargo run --bin admin -- links "dXNlci1pZA=="
//!
//! # Soft-delete links on behalf of their owner
//! cargo run --bin admin -- delete --owner "dXNlci1pZA==" Ab3dE9xZ Qw7rT2pL
//!
//! # Database tools
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_HOST`/`DB_USER`/`DB_PASSWORD`/`DB_NAME` (required)

use go_shortener::config::{self, Config};
use go_shortener::domain::repositories::RecordRepository;
use go_shortener::infrastructure::persistence::PgRecordRepository;
use go_shortener::server::connect_pool;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing go-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Show link and user counts
    Stats,

    /// Show where a short key points
    Resolve {
        key: String,
    },

    /// List the live links of a user
    Links {
        /// Caller id, as stored in the `user_id` cookie
        owner: String,
    },

    /// Soft-delete links on behalf of their owner
    Delete {
        /// Caller id that owns the links
        #[arg(short, long)]
        owner: String,

        /// Short keys to delete
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config: Config = config::load_from_env()?;
    let database_url = config
        .database_url
        .clone()
        .context("DATABASE_URL or DB_HOST must be set")?;

    let pool = connect_pool(&database_url, &config).await?;
    let repo = PgRecordRepository::new(Arc::new(pool.clone()));

    match cli.command {
        Commands::Stats => handle_stats(&repo).await?,
        Commands::Resolve { key } => handle_resolve(&repo, &key).await?,
        Commands::Links { owner } => handle_links(&repo, &owner, &config.base_url).await?,
        Commands::Delete { owner, keys } => handle_delete(&repo, &owner, keys).await?,
        Commands::Db { action } => handle_db_action(action, &repo, &pool).await?,
    }

    pool.close().await;
    Ok(())
}

/// Displays link and user counts over non-deleted records.
async fn handle_stats(repo: &PgRecordRepository) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let stats = repo
        .stats()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load statistics: {}", e))?;

    println!(
        "  Live links: {}",
        stats
            .non_deleted_record_count
            .to_string()
            .bright_green()
            .bold()
    );
    println!(
        "  Users:      {}",
        stats.distinct_owner_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

async fn handle_resolve(repo: &PgRecordRepository, key: &str) -> Result<()> {
    let record = repo
        .get(key)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    match record {
        None => println!("{} {}", key.cyan(), "not found".yellow()),
        Some(view) => {
            let status = if view.is_deleted {
                "DELETED".red()
            } else {
                "ACTIVE".green()
            };
            println!("{} -> {}  {}", key.cyan(), view.original_url, status);
        }
    }

    Ok(())
}

/// Lists a user's live links as full short URLs.
async fn handle_links(repo: &PgRecordRepository, owner: &str, base_url: &str) -> Result<()> {
    println!("{} {}", "Links of".bright_blue().bold(), owner.cyan());
    println!();

    let links = repo
        .list_by_owner(owner)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    let base_url = base_url.trim_end_matches('/');
    for link in &links {
        println!(
            "  {:<40} {}",
            format!("{}/{}", base_url, link.short_key).bright_white(),
            link.original_url.bright_black()
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Applies a soft deletion synchronously, bypassing the deletion queue.
async fn handle_delete(repo: &PgRecordRepository, owner: &str, keys: Vec<String>) -> Result<()> {
    let count = keys.len();

    repo.delete_batch(owner, keys)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete links: {}", e))?;

    println!(
        "{} {} key(s) processed; keys owned by someone else were skipped",
        "Done:".green().bold(),
        count
    );

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(
    action: DbAction,
    repo: &PgRecordRepository,
    pool: &PgPool,
) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            repo.ping()
                .await
                .map_err(|e| anyhow::anyhow!("Database unreachable: {}", e))?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
        DbAction::Migrate => {
            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Failed to run migrations")?;

            println!("{}", "Migrations applied".green().bold());
        }
    }

    Ok(())
}
