//! Network configuration and environment loading.

use incent_agent::{AgentConfig, ConfigError};

use crate::output;

/// Supported network configuration.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub name: &'static str,
    pub chain_id: u64,
    pub rpc_urls: &'static [&'static str],
    pub explorer: &'static str,
    pub description: &'static str,
}

/// All supported networks.
pub const NETWORKS: &[NetworkConfig] = &[
    NetworkConfig {
        name: "base-sepolia",
        chain_id: 84532,
        rpc_urls: &[
            "https://sepolia.base.org",
            "https://base-sepolia-rpc.publicnode.com",
        ],
        explorer: "https://sepolia.basescan.org",
        description: "Base Sepolia Testnet (default)",
    },
    NetworkConfig {
        name: "base-mainnet",
        chain_id: 8453,
        rpc_urls: &[
            "https://mainnet.base.org",
            "https://base.publicnode.com",
            "https://1rpc.io/base",
        ],
        explorer: "https://basescan.org",
        description: "Base Mainnet (Coinbase L2)",
    },
    NetworkConfig {
        name: "ethereum-sepolia",
        chain_id: 11155111,
        rpc_urls: &[
            "https://ethereum-sepolia.publicnode.com",
            "https://rpc.sepolia.org",
        ],
        explorer: "https://sepolia.etherscan.io",
        description: "Ethereum Sepolia Testnet",
    },
    NetworkConfig {
        name: "ethereum-mainnet",
        chain_id: 1,
        rpc_urls: &[
            "https://eth.llamarpc.com",
            "https://ethereum-rpc.publicnode.com",
        ],
        explorer: "https://etherscan.io",
        description: "Ethereum Mainnet",
    },
];

/// Get network config by name.
pub fn get_network(name: &str) -> Option<&'static NetworkConfig> {
    NETWORKS.iter().find(|n| n.name.eq_ignore_ascii_case(name))
}

/// Load the agent configuration, reporting problems the way users expect.
///
/// Returns `None` after printing what is missing.
pub fn load_agent_config() -> Option<AgentConfig> {
    match AgentConfig::from_env() {
        Ok(config) => {
            for warning in &config.warnings {
                output::warn(warning);
            }
            Some(config)
        }
        Err(e @ ConfigError::MissingVariables(_)) => {
            output::error("Required environment variables are not set");
            for line in e.hints() {
                eprintln!("{}", line);
            }
            None
        }
        Err(e) => {
            output::error(&e.to_string());
            None
        }
    }
}
