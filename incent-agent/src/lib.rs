//! # Incent Agent
//!
//! **Tool-calling agent that scores reviews and prepares reviewer payouts**
//!
//! The agent wraps the `incent-core` scorer, incentive calculator and payout
//! generator as tools, and drives them from a chat model in either an
//! interactive chat loop or an autonomous loop.
//!
//! ## Features
//!
//! - **Explicit configuration**: [`AgentConfig`] is loaded once and passed in
//! - **Persistent wallet**: one local signing key, reused across restarts
//! - **Validated tools**: schemas compiled at registration, arguments checked per call
//! - **Cancellable sessions**: chat and autonomous loops stop on a shutdown signal
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use incent_agent::{initialize_agent, AgentConfig, ShutdownSignal, DEFAULT_MESSAGE_MODIFIER};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AgentConfig::from_env()?;
//! let initialized = initialize_agent(&config, DEFAULT_MESSAGE_MODIFIER)?;
//!
//! let mut input = tokio::io::BufReader::new(tokio::io::stdin());
//! let mut session = initialized.session();
//! session
//!     .run_chat(&mut input, &mut std::io::stdout(), ShutdownSignal::never())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod bootstrap;
pub mod builtin;
pub mod config;
pub mod error;
pub mod llm;
pub mod session;
pub mod tools;
pub mod wallet;

pub use agent::{
    review_prompt, AgentChunk, ChunkSink, ReactAgent, ThreadMemory, TranscriptWriter, TurnSummary,
    TRANSCRIPT_DELIMITER,
};
pub use bootstrap::{
    initialize_agent, initialize_agent_with_model, InitializedAgent, DEFAULT_MESSAGE_MODIFIER,
};
pub use builtin::register_builtin_tools;
pub use config::{AgentConfig, ConfigError, REQUIRED_VARS};
pub use error::{AgentError, Result};
pub use llm::{AssistantTurn, ChatMessage, ChatModel, Role, ToolCall, XaiChatModel};
pub use session::{
    choose_mode, shutdown_channel, Session, SessionMode, SessionState, ShutdownSignal,
    ShutdownTrigger, TerminationReason, AUTONOMOUS_THOUGHT,
};
pub use tools::{Tool, ToolError, ToolRegistry, ToolSpec};
pub use wallet::{WalletData, WalletOrigin, WalletStore};
