//! Command handlers.

use crate::cli::{FlagKind, GoalOutcome};
use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate, Utc};
use magic_common::TrackerSession;
use magic_shared::dates::{format_date, parse_date, DateRange};
use magic_shared::entries::ManifestEntry;
use magic_shared::stats::RangeStats;
use magic_shared::tasks::{Task, TaskSet};
use magic_shared::{MagicError, RankRejection};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct TodayReport {
    date: String,
    tasks: TaskSet,
    completed: usize,
}

pub async fn today(session: &TrackerSession, json: bool) -> Result<()> {
    let tasks = session.today_tasks().await;

    if json {
        let report = TodayReport {
            date: format_date(session.today()),
            tasks,
            completed: tasks.count(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", format_date(session.today()).bold());
    for task in Task::ALL {
        if tasks.get(task) {
            println!("  {} {}", "✓".green(), task.label());
        } else {
            println!("  {} {}", "·".dimmed(), task.label().dimmed());
        }
    }
    println!("  {}/5 done", tasks.count());
    Ok(())
}

pub async fn streak(session: &TrackerSession, json: bool) -> Result<()> {
    let state = session.current_streak().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    let units = state.units;
    println!("Current streak: {} days", state.length.bold());
    println!(
        "  {} year · {} month · {} week · {} day units ({} before today)",
        units.years,
        units.months,
        units.weeks,
        units.days,
        units.past_day_units()
    );
    Ok(())
}

pub async fn calendar(session: &TrackerSession, month: Option<String>, json: bool) -> Result<()> {
    let stats = match month {
        Some(m) => {
            let first = parse_month(&m)?;
            let range = DateRange::month(first.year(), first.month())?;
            session.aggregate(range).await
        }
        None => session.calendar().await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    if stats.per_day.is_empty() {
        println!("No activity in this range.");
        return Ok(());
    }
    for (date, tasks) in &stats.per_day {
        let marks: String = Task::ALL
            .iter()
            .map(|t| if tasks.get(*t) { initial(*t) } else { '.' })
            .collect();
        println!("  {}  {}", format_date(*date), marks);
    }
    Ok(())
}

pub async fn stats(session: &TrackerSession, json: bool) -> Result<()> {
    let stats = session.calendar().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&LifetimeReport::from(&stats))?);
        return Ok(());
    }

    println!("Current streak:  {}", stats.current_streak);
    println!("Longest streak:  {}", stats.longest_streak);
    println!("Active days:     {}", stats.total_active_days);
    println!("Manifest days:   {}", stats.manifest_days);
    println!("Inspire days:    {}", stats.inspire_days);
    println!("Courage posts:   {}", stats.courage_posts);
    println!(
        "Goals:           {} set, {} met ({}%)",
        stats.goals_set,
        stats.goals_met,
        stats.goal_completion_pct()
    );
    Ok(())
}

#[derive(Serialize)]
struct LifetimeReport {
    current_streak: u32,
    longest_streak: u32,
    total_active_days: u32,
    manifest_days: u32,
    inspire_days: u32,
    courage_posts: u32,
    goals_set: u32,
    goals_met: u32,
    goal_completion_pct: u32,
}

impl From<&RangeStats> for LifetimeReport {
    fn from(stats: &RangeStats) -> Self {
        Self {
            current_streak: stats.current_streak,
            longest_streak: stats.longest_streak,
            total_active_days: stats.total_active_days,
            manifest_days: stats.manifest_days,
            inspire_days: stats.inspire_days,
            courage_posts: stats.courage_posts,
            goals_set: stats.goals_set,
            goals_met: stats.goals_met,
            goal_completion_pct: stats.goal_completion_pct(),
        }
    }
}

pub async fn manifest(session: &TrackerSession, entry: ManifestEntry) -> Result<()> {
    let entry = ManifestEntry {
        saved_at: Some(Utc::now().to_rfc3339()),
        ..entry
    };
    session
        .recorder()
        .save_manifest(session.today(), &entry)
        .await
        .context("Failed to save manifest entry")?;
    println!("Saved manifest entry for {}", format_date(session.today()));
    Ok(())
}

pub async fn entries(session: &TrackerSession, limit: usize) -> Result<()> {
    let entries = session.recorder().past_manifest_entries().await;
    if entries.is_empty() {
        println!("No manifest entries yet.");
        return Ok(());
    }
    for (date, entry) in entries.iter().take(limit) {
        println!("{}", format_date(*date).bold());
        print_field("Muse", &entry.call_muse);
        print_field("Stalls", &entry.dump_stalls);
        print_field("Vision", &entry.manifest_vision);
        print_field("Goal", &entry.growth_goal);
    }
    Ok(())
}

pub async fn art(session: &TrackerSession, seconds: Option<u64>, reset: bool) -> Result<()> {
    if reset {
        session
            .recorder()
            .reset_weekly_art_time(session.today())
            .await
            .context("Failed to reset weekly art time")?;
        println!("Weekly art time reset");
        return Ok(());
    }
    let seconds = seconds.context("Seconds of art time are required")?;
    let weekly = session
        .recorder()
        .add_art_time(session.today(), seconds)
        .await
        .context("Failed to record art time")?;
    println!("Weekly art time: {}", format_duration(weekly));
    Ok(())
}

pub async fn flag(session: &TrackerSession, kind: FlagKind) -> Result<()> {
    let recorder = session.recorder();
    match kind {
        FlagKind::ArtCreated => recorder.mark_art_created(session.today()).await?,
        FlagKind::EmailSent => recorder.mark_email_sent(session.today()).await?,
    }
    println!("Recorded for {}", format_date(session.today()));
    Ok(())
}

pub async fn ack_goal(session: &TrackerSession, outcome: GoalOutcome) -> Result<()> {
    let met = matches!(outcome, GoalOutcome::Yes);
    session
        .recorder()
        .acknowledge_goal(session.today(), met)
        .await?;
    println!("Goal marked as {}", if met { "met" } else { "not met" });
    Ok(())
}

pub async fn rank(session: &mut TrackerSession, batches: Vec<String>, browse: bool) -> Result<()> {
    let batches: Vec<Vec<String>> = batches
        .iter()
        .map(|b| b.split(',').map(|s| s.trim().to_string()).collect())
        .collect();

    let mut remaining = batches.into_iter();
    let first = remaining.next().unwrap_or_default();
    session.start_voting(first.clone()).await?;

    let mut current = Some(first);
    while let Some(items) = current.take() {
        if session.voting().map(|v| v.can_browse()).unwrap_or(false) {
            println!("Today is already ranked.");
            break;
        }
        for (i, item) in items.iter().enumerate() {
            let rank = u8::try_from(i + 1).context("Too many items in batch")?;
            session.assign_rank(item, rank)?;
        }
        let submitted = session.submit_batch(Some(Utc::now().to_rfc3339())).await?;
        println!("Submitted batch {}", submitted.batch.batch);
        if submitted.completes_day {
            println!("{}", "Voting complete for today".green());
            break;
        }
        match remaining.next() {
            Some(next) => {
                session.next_batch(next.clone())?;
                current = Some(next);
            }
            None => bail!(
                "More batches are required before today counts as ranked (submitted {})",
                submitted.batch.batch
            ),
        }
    }

    if browse {
        session.record_browse().await?;
        println!("Recorded browsing");
    }
    Ok(())
}

pub async fn prompt(session: &TrackerSession, file: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let prompts: Vec<String> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", file.display()))?;
    let challenge = session
        .recorder()
        .todays_challenge(session.today(), &prompts)
        .await
        .context("Failed to save today's challenge")?;
    match challenge {
        Some(c) => println!("{}", c),
        None => bail!("{} has no prompts", file.display()),
    }
    Ok(())
}

/// `{"error": kind, "message": ...}` for a failed `--json` command
pub fn error_report(err: &anyhow::Error) -> serde_json::Value {
    let kind = err
        .chain()
        .find_map(|e| {
            e.downcast_ref::<MagicError>()
                .map(MagicError::kind)
                .or_else(|| e.downcast_ref::<RankRejection>().map(|_| "rank_rejected"))
        })
        .unwrap_or("error");
    serde_json::json!({
        "error": kind,
        "message": format!("{:#}", err),
    })
}

fn parse_month(s: &str) -> Result<NaiveDate> {
    parse_date(&format!("{}-01", s.trim()))
        .with_context(|| format!("Invalid month '{}': expected YYYY-MM", s))
}

fn initial(task: Task) -> char {
    task.label().chars().next().unwrap_or('?')
}

fn print_field(label: &str, value: &str) {
    if !value.trim().is_empty() {
        println!("  {}: {}", label.dimmed(), value.trim());
    }
}

fn format_duration(seconds: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}
