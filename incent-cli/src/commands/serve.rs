//! Serve command implementation.

use clap::Args;

use incent_agent::{initialize_agent, AgentConfig, DEFAULT_MESSAGE_MODIFIER};
use incent_registry::{IpfsClient, DEFAULT_GATEWAY, DEFAULT_PINNING_API};

use crate::api::{start_server, ApiState};
use crate::output;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    pub port: u16,

    /// IPFS gateway host or URL
    #[arg(long, env = "PINATA_GATEWAY", default_value = DEFAULT_GATEWAY)]
    pub gateway: String,

    /// Serve without the agent endpoint
    #[arg(long)]
    pub no_agent: bool,
}

/// Run the serve command.
pub async fn run(args: ServeArgs) -> i32 {
    let ipfs = match std::env::var("PINATA_JWT").ok().filter(|j| !j.trim().is_empty()) {
        Some(jwt) => {
            let api = std::env::var("PINATA_API_URL").unwrap_or_else(|_| DEFAULT_PINNING_API.to_string());
            match IpfsClient::new(&api, &args.gateway, Some(jwt)) {
                Ok(c) => Some(c),
                Err(e) => {
                    output::error(&e.to_string());
                    return 1;
                }
            }
        }
        None => {
            output::warn("PINATA_JWT not set, /api/service is disabled");
            None
        }
    };

    let (agent, network_id) = if args.no_agent {
        (None, network_from_env())
    } else {
        match AgentConfig::from_env() {
            Ok(config) => match initialize_agent(&config, DEFAULT_MESSAGE_MODIFIER) {
                Ok(initialized) => (Some(initialized), config.network_id),
                Err(e) => {
                    output::error(&format!("Failed to initialize agent: {}", e));
                    return 1;
                }
            },
            Err(e) => {
                output::warn(&format!("{}; /api/agent is disabled", e));
                (None, network_from_env())
            }
        }
    };

    match start_server(args.port, ApiState::new(ipfs, agent, network_id)).await {
        Ok(()) => 0,
        Err(e) => {
            output::error(&format!("Server error: {}", e));
            1
        }
    }
}

fn network_from_env() -> String {
    std::env::var("NETWORK_ID")
        .ok()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| incent_agent::config::DEFAULT_NETWORK_ID.to_string())
}
