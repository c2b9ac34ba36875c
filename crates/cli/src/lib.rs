pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::recommend::RecommendArgs;

#[derive(Debug, Parser)]
#[command(
    name = "lookbook",
    about = "Lookbook recommender CLI",
    long_about = "Query association-rule product recommendations, inspect effective \
                  configuration, and validate ingestion inputs.",
    after_help = "Examples:\n  lookbook recommend --user 42\n  lookbook config\n  lookbook doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Recommend products for a user from the precomputed rule set")]
    Recommend {
        #[arg(long, help = "User identifier from the ratings dataset")]
        user: u32,
        #[arg(long, help = "Path to the ratings CSV (overrides config)")]
        ratings: Option<PathBuf>,
        #[arg(long, help = "Path to the rules JSON document (overrides config)")]
        rules: Option<PathBuf>,
        #[arg(long, help = "Drop duplicate products, keeping the best-lift occurrence")]
        unique: bool,
        #[arg(long, help = "Cap the number of recommendations returned")]
        limit: Option<usize>,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution"
    )]
    Config,
    #[command(about = "Validate config and check that ratings and rules inputs load")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Recommend { user, ratings, rules, unique, limit } => {
            commands::recommend::run(RecommendArgs { user, ratings, rules, unique, limit })
        }
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
