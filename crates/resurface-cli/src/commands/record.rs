use std::collections::HashMap;

use clap::Subcommand;
use resurface_core::{InterventionEvent, UrgeSurfOutcome};

use crate::common::open_tracker;

#[derive(Subcommand)]
pub enum RecordAction {
    /// A completed or skipped urge-surfing session
    Surf {
        #[arg(long, default_value_t = 5.0)]
        before: f64,
        #[arg(long, default_value_t = 5.0)]
        after: f64,
        #[arg(long, default_value_t = 60.0)]
        seconds: f64,
        /// Session was skipped rather than completed
        #[arg(long)]
        skipped: bool,
    },
    /// An intervention choice point
    Intervention {
        /// The user continued to the blocked app
        #[arg(long)]
        proceeded: bool,
        #[arg(long)]
        kind: Option<String>,
        #[arg(long)]
        app: Option<String>,
        #[arg(long)]
        intention: Option<String>,
    },
    /// The intention declared at a choice point
    Intention {
        id: String,
        #[arg(long)]
        proceeded: bool,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        app: Option<String>,
    },
    /// Usage minutes for one app, attributed to now
    Usage { app: String, minutes: f64 },
    /// Backfill a historical day's per-app breakdown (merge)
    Backfill {
        /// Day key, YYYY-MM-DD
        date: String,
        /// app=minutes pairs
        #[arg(value_parser = parse_app_minutes)]
        entries: Vec<(String, f64)>,
    },
    /// A completed training session
    Training { minutes: f64 },
}

fn parse_app_minutes(raw: &str) -> Result<(String, f64), String> {
    let (app, minutes) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected app=minutes, got '{raw}'"))?;
    let minutes: f64 = minutes
        .parse()
        .map_err(|e| format!("bad minutes in '{raw}': {e}"))?;
    Ok((app.to_string(), minutes))
}

pub fn run(action: RecordAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut tracker = open_tracker()?;

    match action {
        RecordAction::Surf {
            before,
            after,
            seconds,
            skipped,
        } => {
            tracker.record_urge_surfing(UrgeSurfOutcome {
                intensity_before: before,
                intensity_after: after,
                duration_seconds: seconds,
                completed: !skipped,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&tracker.today_stats())?
            );
        }
        RecordAction::Intervention {
            proceeded,
            kind,
            app,
            intention,
        } => {
            tracker.record_intervention(InterventionEvent {
                proceeded,
                kind,
                app_package: app,
                intention,
                ..Default::default()
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&tracker.overall_intervention_success_rate())?
            );
        }
        RecordAction::Intention {
            id,
            proceeded,
            text,
            app,
        } => {
            tracker.record_intention(&id, proceeded, text, app);
        }
        RecordAction::Usage { app, minutes } => {
            tracker.record_usage_time(&app, minutes);
            println!(
                "{}",
                serde_json::to_string_pretty(&tracker.today_stats())?
            );
        }
        RecordAction::Backfill { date, entries } => {
            let breakdown: HashMap<String, f64> = entries.into_iter().collect();
            tracker.set_daily_usage_breakdown(&date, breakdown);
        }
        RecordAction::Training { minutes } => {
            tracker.record_training_session(minutes);
        }
    }
    Ok(())
}

pub fn run_reset() -> Result<(), Box<dyn std::error::Error>> {
    let mut tracker = open_tracker()?;
    tracker.reset();
    println!("state reset");
    Ok(())
}
