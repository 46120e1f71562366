use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "resurface-cli", version, about = "Resurface CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record behavioral events
    Record {
        #[command(subcommand)]
        action: commands::record::RecordAction,
    },
    /// Derived statistics and projections
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Habit score
    Score {
        #[command(subcommand)]
        action: commands::score::ScoreAction,
    },
    /// Badge catalog and progress
    Badges {
        #[command(subcommand)]
        action: commands::badges::BadgesAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Reset all tracked state
    Reset,
    /// Generate shell completions
    Completions { shell: Shell },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Record { action } => commands::record::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Score { action } => commands::score::run(action),
        Commands::Badges { action } => commands::badges::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Reset => commands::record::run_reset(),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
