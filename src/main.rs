use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod db;
mod lookup;

use commands::log::LogRepos;
use commands::{ConfigCommand, FoodCommand, LogCommand};
use config::Config;
use db::{init_db, FoodLogRepository, HistoryRepository};

#[derive(Parser)]
#[command(name = "nutrilog")]
#[command(version)]
#[command(about = "A daily food and nutrition log", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log food and review daily totals
    Log(LogCommand),

    /// Search foods and browse recent ones
    Food(FoodCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nutrilog=warn,nutrilog_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Log(cmd)) => {
            let pool = init_db(&config.database_path.value).await?;
            let food_log = FoodLogRepository::new(pool.clone());
            let history = HistoryRepository::new(pool);
            let repos = LogRepos {
                food_log: &food_log,
                history: &history,
            };
            cmd.run(repos, &config).await?;
        }
        Some(Commands::Food(cmd)) => {
            let pool = init_db(&config.database_path.value).await?;
            let history = HistoryRepository::new(pool);
            cmd.run(&history, &config).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
