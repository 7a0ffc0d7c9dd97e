//! Interactive and autonomous sessions.
//!
//! A [`Session`] drives an initialized agent in one of two modes and
//! records why it stopped. Both modes watch a [`ShutdownSignal`] so Ctrl-C
//! ends them cleanly between (or during) turns.

use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::watch;
use tracing::{error, info};

use crate::agent::{ReactAgent, TranscriptWriter};
use crate::error::{AgentError, Result};

pub const CHAT_PROMPT: &str = "\nPrompt: ";

pub const AUTONOMOUS_THOUGHT: &str = "Check your wallet details, then pick a sample customer review, evaluate its helpfulness, calculate the incentive and produce its payout record. Use only your available tools.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Chat,
    Auto,
}

impl FromStr for SessionMode {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "1" | "chat" => Ok(Self::Chat),
            "2" | "auto" => Ok(Self::Auto),
            other => Err(AgentError::Session(format!("unknown mode '{}'", other))),
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chat => write!(f, "chat"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The user typed `exit`.
    ExitCommand,
    EndOfInput,
    Cancelled,
    IterationLimit,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Ready,
    Chatting,
    Autonomous,
    Terminated(TerminationReason),
}

/// Sending half of a shutdown channel.
#[derive(Debug)]
pub struct ShutdownTrigger(watch::Sender<bool>);

impl ShutdownTrigger {
    pub fn trigger(&self) {
        // No receivers left means nobody is waiting.
        let _ = self.0.send(true);
    }
}

/// Receiving half of a shutdown channel.
#[derive(Debug, Clone)]
pub struct ShutdownSignal(watch::Receiver<bool>);

impl ShutdownSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self(rx)
    }

    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolves once the trigger fires. Pending forever if the trigger is dropped unfired.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.0.borrow_and_update() {
                return;
            }
            if self.0.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

pub fn shutdown_channel() -> (ShutdownTrigger, ShutdownSignal) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger(tx), ShutdownSignal(rx))
}

/// Ask the user for a mode until a valid one is entered.
pub async fn choose_mode<R, W>(input: &mut R, out: &mut W) -> Result<SessionMode>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    loop {
        writeln!(out, "\nAvailable modes:")?;
        writeln!(out, "1. chat    - Interactive chat mode")?;
        writeln!(out, "2. auto    - Autonomous action mode")?;
        write!(out, "\nChoose a mode (enter number or name): ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line).await? == 0 {
            return Err(AgentError::Session("input closed before a mode was chosen".to_string()));
        }

        match line.parse::<SessionMode>() {
            Ok(mode) => return Ok(mode),
            Err(_) => writeln!(out, "Invalid choice. Please try again.")?,
        }
    }
}

enum Step<T> {
    Done(T),
    Cancelled,
}

pub struct Session {
    agent: Option<Arc<ReactAgent>>,
    state: SessionState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            agent: None,
            state: SessionState::Uninitialized,
        }
    }

    /// A session already holding an agent.
    pub fn ready(agent: Arc<ReactAgent>) -> Self {
        Self {
            agent: Some(agent),
            state: SessionState::Ready,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn attach(&mut self, agent: Arc<ReactAgent>) -> Result<()> {
        if self.state != SessionState::Uninitialized {
            return Err(self.illegal("attach an agent"));
        }
        self.agent = Some(agent);
        self.state = SessionState::Ready;
        Ok(())
    }

    /// Read prompts from `input` and stream the agent's answers to `out`.
    pub async fn run_chat<R, W>(
        &mut self,
        input: &mut R,
        out: &mut W,
        mut shutdown: ShutdownSignal,
    ) -> Result<TerminationReason>
    where
        R: AsyncBufRead + Unpin,
        W: Write + Send,
    {
        let agent = self.enter(SessionState::Chatting)?;
        info!("Chat session started on thread {}", agent.thread_id());
        writeln!(out, "Starting chat mode... Type 'exit' to end.")?;

        loop {
            write!(out, "{}", CHAT_PROMPT)?;
            out.flush()?;

            let mut line = String::new();
            let read = tokio::select! {
                _ = shutdown.cancelled() => Step::Cancelled,
                n = input.read_line(&mut line) => Step::Done(n),
            };
            let read = match read {
                Step::Cancelled => return Ok(self.finish(TerminationReason::Cancelled)),
                Step::Done(Err(e)) => return Err(self.fail(e.into())),
                Step::Done(Ok(n)) => n,
            };
            if read == 0 {
                return Ok(self.finish(TerminationReason::EndOfInput));
            }

            let prompt = line.trim();
            if prompt.eq_ignore_ascii_case("exit") {
                return Ok(self.finish(TerminationReason::ExitCommand));
            }
            if prompt.is_empty() {
                continue;
            }

            let mut sink = TranscriptWriter::new(&mut *out);
            let outcome = tokio::select! {
                _ = shutdown.cancelled() => Step::Cancelled,
                r = agent.stream(prompt, &mut sink) => Step::Done(r),
            };
            match outcome {
                Step::Cancelled => return Ok(self.finish(TerminationReason::Cancelled)),
                Step::Done(Err(e)) => return Err(self.fail(e)),
                Step::Done(Ok(_)) => {}
            }
        }
    }

    /// Repeatedly run the autonomous thought, sleeping `interval` between turns.
    pub async fn run_autonomous<W>(
        &mut self,
        out: &mut W,
        interval: Duration,
        max_iterations: Option<u64>,
        mut shutdown: ShutdownSignal,
    ) -> Result<TerminationReason>
    where
        W: Write + Send,
    {
        let agent = self.enter(SessionState::Autonomous)?;
        info!("Autonomous session started, interval {:?}", interval);
        writeln!(out, "Starting autonomous mode...")?;

        let mut iterations = 0u64;
        loop {
            if max_iterations.is_some_and(|max| iterations >= max) {
                return Ok(self.finish(TerminationReason::IterationLimit));
            }

            let mut sink = TranscriptWriter::new(&mut *out);
            let outcome = tokio::select! {
                _ = shutdown.cancelled() => Step::Cancelled,
                r = agent.stream(AUTONOMOUS_THOUGHT, &mut sink) => Step::Done(r),
            };
            match outcome {
                Step::Cancelled => return Ok(self.finish(TerminationReason::Cancelled)),
                Step::Done(Err(e)) => return Err(self.fail(e)),
                Step::Done(Ok(_)) => iterations += 1,
            }

            if max_iterations.is_some_and(|max| iterations >= max) {
                return Ok(self.finish(TerminationReason::IterationLimit));
            }

            let slept = tokio::select! {
                _ = shutdown.cancelled() => Step::Cancelled,
                _ = tokio::time::sleep(interval) => Step::Done(()),
            };
            if let Step::Cancelled = slept {
                return Ok(self.finish(TerminationReason::Cancelled));
            }
        }
    }

    fn enter(&mut self, next: SessionState) -> Result<Arc<ReactAgent>> {
        let agent = match (&self.state, &self.agent) {
            (SessionState::Ready, Some(agent)) => Arc::clone(agent),
            _ => return Err(self.illegal(&format!("enter {:?}", next))),
        };
        self.state = next;
        Ok(agent)
    }

    fn finish(&mut self, reason: TerminationReason) -> TerminationReason {
        info!("Session ended: {:?}", reason);
        self.state = SessionState::Terminated(reason.clone());
        reason
    }

    fn fail(&mut self, err: AgentError) -> AgentError {
        error!("Session failed: {}", err);
        self.state = SessionState::Terminated(TerminationReason::Failed(err.to_string()));
        err
    }

    fn illegal(&self, action: &str) -> AgentError {
        AgentError::Session(format!("cannot {} while {:?}", action, self.state))
    }
}
