//! Incent CLI
//!
//! Terminal interface for review helpfulness scoring, reviewer incentives
//! and the review agent.

#[cfg(feature = "api")]
mod api;
mod commands;
mod config;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "incent")]
#[command(author = "LogicCrafter")]
#[command(version = "0.1.0")]
#[command(about = "Incent - reward helpful reviews on-chain", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the review agent in chat or autonomous mode
    Agent(commands::agent::AgentArgs),

    /// Ask the agent to evaluate a single review
    Evaluate(commands::evaluate::EvaluateArgs),

    /// Score a review's helpfulness offline
    Score(commands::score::ScoreArgs),

    /// Convert a helpfulness score into an incentive amount
    Incentive(commands::incentive::IncentiveArgs),

    /// Generate a payout record for a reviewer
    Payout(commands::payout::PayoutArgs),

    /// List, register and inspect services
    Services(commands::services::ServicesArgs),

    /// List supported networks
    Networks,

    /// Start the HTTP API
    #[cfg(feature = "api")]
    Serve(commands::serve::ServeArgs),
}

/// Logs go to stderr so stdout stays clean for transcripts and JSON.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let json = std::env::var("INCENT_LOG_JSON").map(|v| v == "1").unwrap_or(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Agent(args) => commands::agent::run(args).await,
        Commands::Evaluate(args) => commands::evaluate::run(args).await,
        Commands::Score(args) => commands::score::run(args),
        Commands::Incentive(args) => commands::incentive::run(args),
        Commands::Payout(args) => commands::payout::run(args),
        Commands::Services(args) => commands::services::run(args).await,
        Commands::Networks => commands::networks::run(),
        #[cfg(feature = "api")]
        Commands::Serve(args) => commands::serve::run(args).await,
    };

    std::process::exit(exit_code);
}
