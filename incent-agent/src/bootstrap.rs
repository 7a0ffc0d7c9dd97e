//! Agent bootstrap.
//!
//! Wires configuration, wallet, model and tools into a ready agent.

use std::sync::Arc;

use tracing::info;

use crate::agent::{review_prompt, ChunkSink, ReactAgent, TurnSummary};
use crate::builtin::register_builtin_tools;
use crate::config::AgentConfig;
use crate::error::Result;
use crate::llm::{ChatModel, XaiChatModel};
use crate::session::Session;
use crate::tools::ToolRegistry;
use crate::wallet::{WalletData, WalletOrigin, WalletStore};

/// Default system prompt for the review agent.
pub const DEFAULT_MESSAGE_MODIFIER: &str = "You are a helpful agent that evaluates customer reviews and rewards reviewers onchain. \
When given a review, check how helpful it is with your tools, calculate the incentive for its score, and produce the payout record when asked. \
You cannot send funds yourself; payouts are settled from the records you produce. If asked where to send funds, provide your wallet details. \
Before executing your first action, get the wallet details to see what network you're on. \
If there is a 5XX (internal) HTTP error code, ask the user to try again later. \
If someone asks you to do something you can't do with your currently available tools, you must say so. \
Be concise and helpful with your responses. Refrain from restating your tools' descriptions unless it is explicitly requested.";

/// A bootstrapped agent together with the wallet it runs under.
pub struct InitializedAgent {
    pub agent: Arc<ReactAgent>,
    pub wallet: WalletData,
    pub wallet_origin: WalletOrigin,
}

impl InitializedAgent {
    /// A session ready to enter chat or autonomous mode.
    pub fn session(&self) -> Session {
        Session::ready(Arc::clone(&self.agent))
    }

    /// Run a single turn asking the agent to evaluate `review`.
    pub async fn evaluate_review(&self, review: &str, sink: &mut dyn ChunkSink) -> Result<TurnSummary> {
        self.agent.stream(&review_prompt(review), sink).await
    }
}

/// Bootstrap against the configured xAI endpoint.
pub fn initialize_agent(config: &AgentConfig, message_modifier: &str) -> Result<InitializedAgent> {
    let model = XaiChatModel::from_config(config)?;
    initialize_agent_with_model(config, message_modifier, Arc::new(model))
}

/// Bootstrap with any chat model.
///
/// Wallet data is written back to `config.wallet_data_file` only after every
/// other step has succeeded.
pub fn initialize_agent_with_model(
    config: &AgentConfig,
    message_modifier: &str,
    model: Arc<dyn ChatModel>,
) -> Result<InitializedAgent> {
    let store = WalletStore::new(&config.wallet_data_file);
    let (wallet, wallet_origin) = store.load_or_provision(&config.network_id)?;
    match wallet_origin {
        WalletOrigin::Loaded => info!("Loaded wallet {} from {}", wallet.wallet_id, store.path().display()),
        WalletOrigin::Created => info!("Created wallet {} on {}", wallet.wallet_id, wallet.network_id),
    }

    let mut tools = ToolRegistry::new();
    register_builtin_tools(&mut tools, &wallet)?;

    let agent = ReactAgent::new(model, Arc::new(tools), message_modifier).with_max_steps(config.max_steps);

    store.persist(&wallet)?;

    Ok(InitializedAgent {
        agent: Arc::new(agent),
        wallet,
        wallet_origin,
    })
}
