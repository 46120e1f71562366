use clap::Subcommand;
use resurface_core::badge_progress;

use crate::common::open_tracker;

#[derive(Subcommand)]
pub enum BadgesAction {
    /// All badges with earned state
    List,
    /// Progress toward each unearned badge
    Progress {
        /// Monthly reduction percent vs baseline, if known
        #[arg(long)]
        reduction: Option<f64>,
    },
    /// Evaluate unlock conditions now
    Check {
        #[arg(long)]
        reduction: Option<f64>,
    },
}

pub fn run(action: BadgesAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut tracker = open_tracker()?;

    match action {
        BadgesAction::List => {
            println!(
                "{}",
                serde_json::to_string_pretty(&tracker.snapshot().lifetime.badges)?
            );
        }
        BadgesAction::Progress { reduction } => {
            let context = tracker.badge_context(reduction);
            let lifetime = &tracker.snapshot().lifetime;
            let report: Vec<serde_json::Value> = lifetime
                .badges
                .iter()
                .map(|badge| {
                    let progress = badge_progress(badge, lifetime, &context);
                    serde_json::json!({
                        "id": badge.id,
                        "name": badge.name,
                        "earned": badge.is_earned(),
                        "progress": progress,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        BadgesAction::Check { reduction } => {
            let context = tracker.badge_context(reduction);
            let earned = tracker.check_badges(&context);
            if earned.is_empty() {
                println!("no new badges");
            } else {
                println!("{}", serde_json::to_string_pretty(&earned)?);
            }
        }
    }
    Ok(())
}
