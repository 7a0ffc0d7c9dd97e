//! Payout command implementation.

use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use ethers::types::Address;

use incent_core::{generate_payout, HelpfulnessScore, PayoutRequest};

use crate::output;

#[derive(Args)]
pub struct PayoutArgs {
    /// Helpfulness score (1-100)
    #[arg(short, long)]
    pub score: f64,

    /// On-chain id of the reviewed service
    #[arg(long)]
    pub service_id: u64,

    /// Reviewer address to pay
    #[arg(short, long)]
    pub reviewer: String,

    /// Network the payout is issued on
    #[arg(short, long, env = "NETWORK_ID", default_value = "base-sepolia")]
    pub network: String,

    /// Write the payout JSON to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Run the payout command.
pub fn run(args: PayoutArgs) -> i32 {
    let reviewer: Address = match args.reviewer.trim().parse() {
        Ok(a) => a,
        Err(_) => {
            output::error(&format!("Invalid reviewer address: {}", args.reviewer));
            return 1;
        }
    };

    let request = PayoutRequest {
        service_id: args.service_id,
        reviewer,
        score: HelpfulnessScore::from_f64(args.score),
        network_id: args.network,
    };

    let record = match generate_payout(&request, Utc::now()) {
        Ok(r) => r,
        Err(e) => {
            output::error(&format!("Failed to generate payout: {}", e));
            return 1;
        }
    };

    let json = match record.to_json() {
        Ok(j) => j,
        Err(e) => {
            output::error(&format!("Failed to serialize payout: {}", e));
            return 1;
        }
    };

    match args.output {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, &json) {
                output::error(&format!("Failed to write {}: {}", path.display(), e));
                return 1;
            }
            output::success(&format!("Payout {} written to {}", record.payout_id, path.display()));
            output::kv("Amount", &record.amount.to_string());
        }
        None => println!("{}", json),
    }

    0
}
