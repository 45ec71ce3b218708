//! CLI administration tool for linkgate.
//!
//! Provides commands for inspecting accounts, purging expired links and
//! checking the database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List registered users
//! cargo run --bin admin -- users list
//!
//! # Delete expired short links
//! cargo run --bin admin -- links purge-expired
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use linkgate::application::services::LinkService;
use linkgate::domain::repositories::{LinkRepository, UserRepository};
use linkgate::infrastructure::persistence::{PgLinkRepository, PgUserRepository};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing linkgate.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect user accounts
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Manage short links
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UsersAction {
    /// List registered users, newest first
    List {
        /// Maximum number of users to show
        #[arg(short, long, default_value_t = 50)]
        limit: i64,
    },
}

#[derive(Subcommand)]
enum LinksAction {
    /// Delete every link whose expiry has passed
    PurgeExpired {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;
    let pool = Arc::new(pool);

    match cli.command {
        Commands::Users { action } => handle_users_action(action, pool).await?,
        Commands::Links { action } => handle_links_action(action, pool).await?,
        Commands::Stats => handle_stats(pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_users_action(action: UsersAction, pool: Arc<PgPool>) -> Result<()> {
    let repo = PgUserRepository::new(pool);

    match action {
        UsersAction::List { limit } => list_users(&repo, limit).await,
    }
}

/// Prints users as a table.
///
/// ```text
/// 👥 Users
///
///   ID    Username                       Registered
///   ──────────────────────────────────────────────────────────
///   1     alice                          2025-01-15 10:30
/// ```
async fn list_users(repo: &PgUserRepository, limit: i64) -> Result<()> {
    println!("{}", "👥 Users".bright_blue().bold());
    println!();

    let users = repo
        .list(limit)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users registered".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<30} {:<20}",
        "ID".bright_white().bold(),
        "Username".bright_white().bold(),
        "Registered".bright_white().bold()
    );
    println!("  {}", "─".repeat(58).bright_black());

    for user in &users {
        println!(
            "  {:<5} {:<30} {}",
            user.id.to_string().bright_black(),
            user.username.cyan(),
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!("  Shown: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn handle_links_action(action: LinksAction, pool: Arc<PgPool>) -> Result<()> {
    let repo = Arc::new(PgLinkRepository::new(pool));
    let base_url = std::env::var("PUBLIC_BASE_URL").unwrap_or_default();
    let service = LinkService::new(repo.clone(), base_url);

    match action {
        LinksAction::PurgeExpired { yes } => purge_expired(&repo, &service, yes).await,
    }
}

/// Deletes expired links after confirmation.
///
/// Expired links already resolve as not found; purging only reclaims storage.
async fn purge_expired(
    repo: &PgLinkRepository,
    service: &LinkService<PgLinkRepository>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🧹 Purge Expired Links".bright_blue().bold());
    println!();

    let now = Utc::now();
    let total = repo
        .count(None)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;
    let live = repo
        .count(Some(now))
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;
    let expired = total - live;

    if expired == 0 {
        println!("{}", "  Nothing to purge".yellow());
        return Ok(());
    }

    println!(
        "  Expired links: {}",
        expired.to_string().bright_yellow().bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete these links?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let removed = service
        .purge_expired(now)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to purge links: {}", e))?;

    println!();
    println!(
        "{} {}",
        "✅ Removed".green().bold(),
        format!("{removed} link(s)").bright_white()
    );
    println!();

    Ok(())
}

/// Displays user and link counts.
async fn handle_stats(pool: Arc<PgPool>) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let users = PgUserRepository::new(pool.clone());
    let links = PgLinkRepository::new(pool);

    let users_count = users
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;
    let links_count = links
        .count(None)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;
    let live_count = links
        .count(Some(Utc::now()))
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    println!(
        "  Users:         {}",
        users_count.to_string().bright_green().bold()
    );
    println!(
        "  Links:         {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Live links:    {}",
        live_count.to_string().bright_green().bold()
    );
    println!(
        "  Expired links: {}",
        (links_count - live_count).to_string().bright_black()
    );
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", applied.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
