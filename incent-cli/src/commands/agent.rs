//! Agent command implementation.

use std::time::Duration;

use clap::Args;
use tokio::io::BufReader;

use incent_agent::{
    choose_mode, initialize_agent, shutdown_channel, InitializedAgent, SessionMode,
    TerminationReason, WalletOrigin, DEFAULT_MESSAGE_MODIFIER,
};

use crate::config::load_agent_config;
use crate::output;

#[derive(Args)]
pub struct AgentArgs {
    /// Session mode: chat (1) or auto (2). Asks when omitted.
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Seconds between autonomous turns
    #[arg(long)]
    pub interval: Option<u64>,

    /// Stop autonomous mode after this many turns
    #[arg(long)]
    pub max_iterations: Option<u64>,
}

/// Run the agent command.
pub async fn run(args: AgentArgs) -> i32 {
    let Some(mut config) = load_agent_config() else {
        return 1;
    };
    if let Some(secs) = args.interval {
        config = config.with_autonomous_interval(Duration::from_secs(secs.max(1)));
    }

    let explicit_mode = match args.mode.as_deref().map(str::parse::<SessionMode>) {
        None => None,
        Some(Ok(mode)) => Some(mode),
        Some(Err(_)) => {
            output::error(&format!(
                "Invalid mode: {} (expected chat or auto)",
                args.mode.unwrap_or_default()
            ));
            return 1;
        }
    };

    let Some(initialized) = bootstrap(&config) else {
        return 1;
    };

    let mut input = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();

    let mode = match explicit_mode {
        Some(mode) => mode,
        None => match choose_mode(&mut input, &mut stdout).await {
            Ok(mode) => mode,
            Err(e) => {
                output::error(&e.to_string());
                return 1;
            }
        },
    };

    let (trigger, shutdown) = shutdown_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.trigger();
        }
    });

    let mut session = initialized.session();
    let result = match mode {
        SessionMode::Chat => session.run_chat(&mut input, &mut stdout, shutdown).await,
        SessionMode::Auto => {
            session
                .run_autonomous(&mut stdout, config.autonomous_interval, args.max_iterations, shutdown)
                .await
        }
    };

    match result {
        Ok(TerminationReason::Cancelled) => {
            output::info("Interrupted, session ended.");
            0
        }
        Ok(reason) => {
            tracing::debug!("Session finished: {:?}", reason);
            0
        }
        Err(e) => {
            output::error(&format!("Error: {}", e));
            1
        }
    }
}

/// Initialize the agent and report the wallet it runs under.
pub(crate) fn bootstrap(config: &incent_agent::AgentConfig) -> Option<InitializedAgent> {
    match initialize_agent(config, DEFAULT_MESSAGE_MODIFIER) {
        Ok(initialized) => {
            let origin = match initialized.wallet_origin {
                WalletOrigin::Loaded => "loaded",
                WalletOrigin::Created => "created",
            };
            tracing::info!(
                "Agent wallet {} ({:?}) on {}, {}",
                initialized.wallet.wallet_id,
                initialized.wallet.default_address,
                initialized.wallet.network_id,
                origin
            );
            Some(initialized)
        }
        Err(e) => {
            output::error(&format!("Failed to initialize agent: {}", e));
            None
        }
    }
}
