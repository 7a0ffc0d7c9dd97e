//! Evaluate command implementation.

use clap::Args;

use incent_agent::TranscriptWriter;

use crate::commands::agent::bootstrap;
use crate::config::load_agent_config;
use crate::output;

#[derive(Args)]
pub struct EvaluateArgs {
    /// The review to evaluate
    pub review: String,
}

/// Run the evaluate command: a single agent turn over one review.
pub async fn run(args: EvaluateArgs) -> i32 {
    if args.review.trim().is_empty() {
        output::error("Review must not be empty");
        return 1;
    }

    let Some(config) = load_agent_config() else {
        return 1;
    };
    let Some(initialized) = bootstrap(&config) else {
        return 1;
    };

    let mut transcript = TranscriptWriter::new(std::io::stdout());
    match initialized.evaluate_review(&args.review, &mut transcript).await {
        Ok(summary) => {
            if summary.hit_step_limit {
                output::warn("The agent stopped before giving a final answer.");
            }
            0
        }
        Err(e) => {
            output::error(&format!("Error: {}", e));
            1
        }
    }
}
