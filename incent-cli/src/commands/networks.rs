//! Networks command implementation.

use colored::Colorize;

use crate::config::NETWORKS;
use crate::output;

/// Run the networks command.
pub fn run() -> i32 {
    output::header("Supported Networks");

    println!();
    println!(
        "{:<18} {:<12} {}",
        "Name".bold(),
        "Chain ID".bold(),
        "Description".bold()
    );
    println!("{}", "─".repeat(60).dimmed());

    for network in NETWORKS {
        println!(
            "{:<18} {:<12} {}",
            network.name.green(),
            network.chain_id,
            network.description.dimmed()
        );
    }

    println!();
    output::hint("Set NETWORK_ID to choose the agent's network.");
    output::hint("Use `incent services --rpc-url <URL>` to override the default RPC.");

    0
}
