use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "birthlog", version, about = "Birthlog CLI")]
struct Cli {
    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Weekly logging streak
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Birth log entries
    Log {
        #[command(subcommand)]
        action: commands::births::LogAction,
    },
    /// Birth statistics
    Stats {
        /// Number of recent weeks to list (defaults to stats.weeks_shown)
        #[arg(long)]
        weeks: Option<u32>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Stored data management
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let ctx = commands::Context::new(cli.today);
    let result = match cli.command {
        Commands::Streak { action } => commands::streak::run(action, &ctx),
        Commands::Log { action } => commands::births::run(action, &ctx),
        Commands::Stats { weeks } => commands::stats::run(weeks, &ctx),
        Commands::Config { action } => commands::config::run(action),
        Commands::Data { action } => commands::data::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
