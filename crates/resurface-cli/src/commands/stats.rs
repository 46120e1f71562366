use clap::Subcommand;

use crate::common::open_tracker;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's stats
    Today,
    /// Current 7-day window with prior-week deltas
    Week,
    /// Current calendar-month achievements
    Month,
    /// Last 4 Monday-aligned weeks
    Trend,
    /// Today vs yesterday
    CompareDay,
    /// This week vs last week
    CompareWeek,
    /// Intention frequency patterns
    Intentions,
    /// Time-of-day usage and intervention patterns
    TimeOfDay,
    /// Reduction vs a baseline of daily minutes
    Reduction { baseline: f64 },
    /// Whether intervention attempts are arriving unusually often
    HighFrequency,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let tracker = open_tracker()?;

    match action {
        StatsAction::Today => {
            println!("{}", serde_json::to_string_pretty(&tracker.today_stats())?);
        }
        StatsAction::Week => {
            println!("{}", serde_json::to_string_pretty(&tracker.weekly_stats())?);
        }
        StatsAction::Month => {
            println!(
                "{}",
                serde_json::to_string_pretty(&tracker.monthly_achievement_stats())?
            );
        }
        StatsAction::Trend => {
            println!("{}", serde_json::to_string_pretty(&tracker.weekly_trend())?);
        }
        StatsAction::CompareDay => {
            println!(
                "{}",
                serde_json::to_string_pretty(&tracker.daily_comparison())?
            );
        }
        StatsAction::CompareWeek => {
            println!(
                "{}",
                serde_json::to_string_pretty(&tracker.weekly_comparison())?
            );
        }
        StatsAction::Intentions => {
            println!(
                "{}",
                serde_json::to_string_pretty(&tracker.intention_pattern_stats())?
            );
        }
        StatsAction::TimeOfDay => {
            println!(
                "{}",
                serde_json::to_string_pretty(&tracker.time_of_day_patterns())?
            );
        }
        StatsAction::Reduction { baseline } => {
            println!("{}", tracker.reduction_rate(baseline));
        }
        StatsAction::HighFrequency => {
            println!("{}", tracker.is_high_frequency_attempts());
        }
    }
    Ok(())
}
