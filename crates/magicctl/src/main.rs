//! MAGIC Control - CLI for the MAGIC tracker
//!
//! Opens the activity store, pins "today" and runs one command through a
//! tracker session.

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use magic_common::{ActivityStore, MagicConfig, SqliteStore, TrackerSession};
use magic_shared::dates::parse_date;
use magic_shared::entries::ManifestEntry;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = MagicConfig::load(cli.config.as_deref())?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let today = match &cli.date {
        Some(d) => parse_date(d).with_context(|| format!("Invalid --date '{}'", d))?,
        None => chrono::Local::now().date_naive(),
    };

    let db_path = cli.db.clone().unwrap_or_else(|| config.store.resolved_path());
    debug!("Using store {} with today = {}", db_path.display(), today);
    let store: Arc<dyn ActivityStore> = Arc::new(
        SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open store {}", db_path.display()))?,
    );

    let mut session = TrackerSession::new(store, today, config.session_options());
    let json = cli.command.json_output();

    match dispatch(&mut session, cli.command).await {
        Err(e) if json => {
            println!("{}", serde_json::to_string_pretty(&commands::error_report(&e))?);
            std::process::exit(1);
        }
        other => other,
    }
}

async fn dispatch(session: &mut TrackerSession, command: Commands) -> Result<()> {
    match command {
        Commands::Today { json } => commands::today(session, json).await,
        Commands::Streak { json } => commands::streak(session, json).await,
        Commands::Calendar { month, json } => commands::calendar(session, month, json).await,
        Commands::Stats { json } => commands::stats(session, json).await,
        Commands::Manifest { muse, dump, vision, goal } => {
            let entry = ManifestEntry {
                call_muse: muse,
                dump_stalls: dump,
                manifest_vision: vision,
                growth_goal: goal,
                saved_at: None,
            };
            commands::manifest(session, entry).await
        }
        Commands::Entries { limit } => commands::entries(session, limit).await,
        Commands::Art { seconds, reset } => commands::art(session, seconds, reset).await,
        Commands::Flag { kind } => commands::flag(session, kind).await,
        Commands::AckGoal { outcome } => commands::ack_goal(session, outcome).await,
        Commands::Rank { batches, browse } => commands::rank(session, batches, browse).await,
        Commands::Prompt { file } => commands::prompt(session, &file).await,
    }
}
