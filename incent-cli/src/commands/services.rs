//! Services command implementation.
//!
//! Mirrors the dashboard: list an owner's services, register a new one,
//! and read (optionally score) a service's feedback.

use clap::{Args, Subcommand};
use ethers::types::Address;

use incent_core::{calculate_incentive, score_review, ServiceMetadata};
use incent_registry::{Dashboard, EthServiceRegistry, IpfsClient, DEFAULT_GATEWAY, DEFAULT_PINNING_API};

use crate::config::get_network;
use crate::output;

#[derive(Args)]
pub struct ServicesArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: ServicesCommands,
}

#[derive(Args)]
pub struct ConnectionArgs {
    /// Service registry contract address
    #[arg(long, env = "SERVICE_REGISTRY_ADDRESS", global = true)]
    pub contract: Option<String>,

    /// Network to use for default RPC and chain id
    #[arg(short, long, env = "NETWORK_ID", default_value = "base-sepolia", global = true)]
    pub network: String,

    /// Custom RPC URL (overrides the network default)
    #[arg(long, env = "RPC_URL", global = true)]
    pub rpc_url: Option<String>,

    /// IPFS gateway host or URL
    #[arg(long, env = "PINATA_GATEWAY", default_value = DEFAULT_GATEWAY, global = true)]
    pub gateway: String,

    /// Pinning API root
    #[arg(long, env = "PINATA_API_URL", default_value = DEFAULT_PINNING_API, global = true, hide = true)]
    pub pinning_api: String,
}

#[derive(Subcommand)]
pub enum ServicesCommands {
    /// List the services owned by an address
    List {
        /// Owner address (defaults to the signer's address)
        #[arg(short, long)]
        owner: Option<String>,
    },
    /// Upload service metadata to IPFS and register it on-chain
    Add {
        /// Service name
        #[arg(long)]
        name: String,
        /// Service description
        #[arg(long, default_value = "")]
        description: String,
        /// Feedback question (repeatable)
        #[arg(short, long = "question", required = true)]
        questions: Vec<String>,
    },
    /// Show the feedback recorded for a service
    Feedback {
        /// Service id
        service_id: u64,
        /// Score each feedback and show its incentive
        #[arg(long)]
        score: bool,
    },
}

/// Run the services command.
pub async fn run(args: ServicesArgs) -> i32 {
    let conn = &args.connection;

    let Some(network) = get_network(&conn.network) else {
        output::error(&format!("Unsupported network: {}", conn.network));
        output::hint("Run 'incent networks' to see supported networks.");
        return 1;
    };

    let contract_address = match conn.contract.as_deref().map(|c| c.trim().parse::<Address>()) {
        Some(Ok(a)) => a,
        Some(Err(_)) => {
            output::error(&format!("Invalid contract address: {}", conn.contract.as_deref().unwrap_or_default()));
            return 1;
        }
        None => {
            output::error("No service registry contract configured");
            output::hint("Pass --contract or set SERVICE_REGISTRY_ADDRESS.");
            return 1;
        }
    };

    let rpc_url = conn
        .rpc_url
        .clone()
        .unwrap_or_else(|| network.rpc_urls[0].to_string());

    let mut contract = match EthServiceRegistry::new(&rpc_url, contract_address) {
        Ok(c) => c,
        Err(e) => {
            output::error(&format!("Failed to connect to {}: {}", rpc_url, e));
            return 1;
        }
    };

    if let Some(key) = env_nonempty("REGISTRY_PRIVATE_KEY") {
        contract = match contract.with_signer(&rpc_url, &key, network.chain_id) {
            Ok(c) => c,
            Err(e) => {
                output::error(&format!("Invalid REGISTRY_PRIVATE_KEY: {}", e));
                return 1;
            }
        };
    }

    let ipfs = match IpfsClient::new(&conn.pinning_api, &conn.gateway, env_nonempty("PINATA_JWT")) {
        Ok(c) => c,
        Err(e) => {
            output::error(&e.to_string());
            return 1;
        }
    };

    let dashboard = Dashboard::new(contract, ipfs);

    match args.command {
        ServicesCommands::List { owner } => list(&dashboard, owner).await,
        ServicesCommands::Add {
            name,
            description,
            questions,
        } => add(&dashboard, ServiceMetadata::new(name, description, questions), network.explorer).await,
        ServicesCommands::Feedback { service_id, score } => feedback(&dashboard, service_id, score).await,
    }
}

async fn list(dashboard: &Dashboard<EthServiceRegistry>, owner: Option<String>) -> i32 {
    let owner: Address = match owner {
        Some(o) => match o.trim().parse() {
            Ok(a) => a,
            Err(_) => {
                output::error(&format!("Invalid owner address: {}", o));
                return 1;
            }
        },
        None => match dashboard.contract().signer_address() {
            Some(a) => a,
            None => {
                output::error("No owner given and no signer configured");
                output::hint("Pass --owner or set REGISTRY_PRIVATE_KEY.");
                return 1;
            }
        },
    };

    output::info("Loading services...");
    let services = match dashboard.list_services(owner).await {
        Ok(s) => s,
        Err(e) => {
            output::error(&format!("Failed to load services: {}", e));
            return 1;
        }
    };

    if services.is_empty() {
        output::info("No services registered for this owner.");
        return 0;
    }

    output::success(&format!("Loaded {} services", services.len()));
    for service in &services {
        output::header(&format!("#{} {}", service.id, service.name));
        if !service.description.is_empty() {
            output::kv("Description", &service.description);
        }
        output::kv("Interactions", &service.interactions.to_string());
        output::kv("Feedbacks", &service.feedbacks.to_string());
        output::kv("Questions", &service.feedback_questions.join(" | "));
        output::kv("Metadata", &service.gateway_url);
    }
    println!();
    0
}

async fn add(dashboard: &Dashboard<EthServiceRegistry>, metadata: ServiceMetadata, explorer: &str) -> i32 {
    output::info("Creating service...");
    match dashboard.add_service(metadata).await {
        Ok(registered) => {
            output::success("Service created successfully!");
            output::kv("Metadata", &registered.metadata_cid);
            output::kv("Transaction", &format!("{}/tx/{:?}", explorer, registered.tx_hash));
            0
        }
        Err(e) => {
            output::error(&format!("Failed to create service: {}", e));
            1
        }
    }
}

async fn feedback(dashboard: &Dashboard<EthServiceRegistry>, service_id: u64, score: bool) -> i32 {
    output::info(&format!("Loading feedback for service #{}...", service_id));
    let feedback = match dashboard.service_feedback(service_id).await {
        Ok(f) => f,
        Err(e) => {
            output::error(&format!("Failed to load feedback: {}", e));
            return 1;
        }
    };

    if feedback.is_empty() {
        output::info("No feedback yet.");
        return 0;
    }

    output::success(&format!("Loaded {} feedback entries", feedback.len()));
    for entry in &feedback {
        output::header(&entry.cid);
        let review = entry.as_review();
        for answer in &review.answers {
            output::kv(&answer.question, &answer.answer);
        }
        if score {
            let report = score_review(&review);
            output::kv("Score", &report.score.to_string());
            output::kv("Incentive", &calculate_incentive(report.score).to_string());
        }
    }
    println!();
    0
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
