//! CLI - Command-line argument parsing
//!
//! Keeps argument parsing separate from execution logic.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// MAGIC tracker inspection and recording tool
#[derive(Parser)]
#[command(name = "magicctl")]
#[command(about = "MAGIC Tracker - daily tasks, streaks and stats", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Activity database (overrides the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Config file (overrides $MAGIC_CONFIG and ~/.config/magic/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    pub date: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show today's five tasks
    Today {
        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Show the current streak and its reward units
    Streak {
        #[arg(long)]
        json: bool,
    },

    /// Show the calendar for a month, or the two-month window by default
    Calendar {
        /// Month as YYYY-MM
        #[arg(long)]
        month: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Show lifetime statistics
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Save today's manifest entry
    Manifest {
        #[arg(long, default_value = "")]
        muse: String,

        #[arg(long, default_value = "")]
        dump: String,

        #[arg(long, default_value = "")]
        vision: String,

        #[arg(long, default_value = "")]
        goal: String,
    },

    /// List past manifest entries, newest first
    Entries {
        /// Show at most this many entries
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Add art time for today, or reset the weekly timer
    Art {
        /// Seconds of art time
        #[arg(required_unless_present = "reset")]
        seconds: Option<u64>,

        /// Reset the weekly timer to zero for the current week
        #[arg(long, conflicts_with = "seconds")]
        reset: bool,
    },

    /// Set a day flag for today
    Flag {
        #[arg(value_enum)]
        kind: FlagKind,
    },

    /// Record whether today's goal was met
    AckGoal {
        #[arg(value_enum)]
        outcome: GoalOutcome,
    },

    /// Submit today's ranking batches; each batch lists item ids best first
    Rank {
        /// Comma-separated item ids, in rank order (repeat per batch)
        #[arg(long = "batch", required = true)]
        batches: Vec<String>,

        /// Also record browsing after voting
        #[arg(long)]
        browse: bool,
    },

    /// Print the day's art challenge, picked from a JSON list of prompts
    Prompt {
        /// Path to a JSON array of strings
        file: PathBuf,
    },
}

impl Commands {
    /// Whether the command reports in JSON, errors included
    pub fn json_output(&self) -> bool {
        match self {
            Commands::Today { json }
            | Commands::Streak { json }
            | Commands::Calendar { json, .. }
            | Commands::Stats { json } => *json,
            _ => false,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FlagKind {
    /// Art was created today
    ArtCreated,
    /// An inspiration email was sent
    EmailSent,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum GoalOutcome {
    Yes,
    No,
}
