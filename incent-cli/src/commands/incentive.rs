//! Incentive command implementation.

use clap::Args;
use serde_json::json;

use incent_core::{calculate_incentive, HelpfulnessScore};

use crate::output;

#[derive(Args)]
pub struct IncentiveArgs {
    /// Helpfulness score (1-100); values outside the range are clamped
    #[arg(allow_hyphen_values = true)]
    pub score: String,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the incentive command.
pub fn run(args: IncentiveArgs) -> i32 {
    let raw: f64 = match args.score.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            output::error(&format!("Invalid score: {}", args.score));
            return 1;
        }
    };

    let score = HelpfulnessScore::from_f64(raw);
    let amount = calculate_incentive(score);

    if args.json {
        println!(
            "{}",
            json!({
                "score": score,
                "incentive_wei": amount.wei().to_string(),
                "incentive_eth": amount.to_ether_string(),
            })
        );
        return 0;
    }

    let in_range = (HelpfulnessScore::MIN.value() as f64..=HelpfulnessScore::MAX.value() as f64).contains(&raw);
    if !in_range {
        output::warn(&format!("Score {} is outside 1-100, using {}", args.score.trim(), score));
    }

    output::header("Reviewer Incentive");
    output::kv("Score", &score.to_string());
    output::kv("Incentive", &amount.to_string());
    output::kv("Wei", &amount.wei().to_string());
    0
}
