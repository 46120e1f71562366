use clap::Subcommand;
use resurface_core::EngineConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the active configuration
    Show,
    /// Set the daily usage goal in minutes
    SetGoal { minutes: f64 },
    /// Add an app package to the tracked set
    Track { package: String },
    /// Remove an app package from the tracked set
    Untrack { package: String },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = EngineConfig::load()?;

    match action {
        ConfigAction::Show => {
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::SetGoal { minutes } => {
            config.daily_goal_minutes = minutes;
            config.save()?;
            println!("daily goal set to {minutes} minutes");
        }
        ConfigAction::Track { package } => {
            if !config.tracked_packages.contains(&package) {
                config.tracked_packages.push(package);
                config.save()?;
            }
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Untrack { package } => {
            config.tracked_packages.retain(|p| p != &package);
            config.save()?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
