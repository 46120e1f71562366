use clap::Subcommand;
use resurface_core::ScoreUpdate;

use crate::common::open_tracker;

#[derive(Subcommand)]
pub enum ScoreAction {
    /// Current score and history
    Show,
    /// Apply the once-per-day score update
    Update,
}

pub fn run(action: ScoreAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut tracker = open_tracker()?;

    match action {
        ScoreAction::Show => {
            let snapshot = tracker.snapshot();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "habitScore": snapshot.habit_score,
                    "lastUpdated": snapshot.habit_score_last_updated_date,
                    "history": snapshot.habit_score_history,
                }))?
            );
        }
        ScoreAction::Update => {
            let update = tracker.update_habit_score();
            match update {
                ScoreUpdate::AlreadyUpdated => println!("already updated today"),
                ScoreUpdate::NoData => println!("no data for yesterday; score unchanged"),
                ScoreUpdate::Applied { previous, current } => {
                    println!("{previous} -> {current}");
                }
            }
        }
    }
    Ok(())
}
