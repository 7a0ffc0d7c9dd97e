//! Score command implementation.

use std::path::PathBuf;

use clap::Args;

use incent_core::{score_review, Review};

use crate::output;

#[derive(Args)]
pub struct ScoreArgs {
    /// Review text, or a JSON object of question/answer pairs
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub review: Option<String>,

    /// Read the review from a file instead
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the score command.
pub fn run(args: ScoreArgs) -> i32 {
    let input = match (args.review, args.file) {
        (Some(text), _) => text,
        (None, Some(path)) => match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                output::error(&format!("Failed to read {}: {}", path.display(), e));
                return 1;
            }
        },
        (None, None) => {
            output::error("Provide a review or --file");
            return 1;
        }
    };

    let report = score_review(&Review::parse(&input));

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                output::error(&format!("Failed to serialize report: {}", e));
                return 1;
            }
        }
    } else {
        output::score_report(&report);
    }

    0
}
