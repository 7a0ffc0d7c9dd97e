//! Tool-calling agent loop.
//!
//! Each turn alternates between asking the model and running the tools it
//! requests, until the model answers without tool calls or the step limit
//! is hit. Conversation history is kept per thread so follow-up prompts see
//! earlier turns.

use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::config::DEFAULT_MAX_STEPS;
use crate::error::Result;
use crate::llm::{ChatMessage, ChatModel};
use crate::tools::ToolRegistry;

/// Line printed after every chunk of agent output.
pub const TRANSCRIPT_DELIMITER: &str = "-------------------";

pub const DEFAULT_THREAD_ID: &str = "review-incentive-agent";

/// One unit of streamed agent output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentChunk {
    /// Text produced by the model.
    Agent(String),
    /// Output of one tool call.
    Tools { name: String, content: String },
}

impl AgentChunk {
    pub fn content(&self) -> &str {
        match self {
            Self::Agent(content) | Self::Tools { content, .. } => content,
        }
    }
}

/// Receives chunks as the agent produces them.
pub trait ChunkSink: Send {
    fn emit(&mut self, chunk: &AgentChunk) -> Result<()>;
}

impl ChunkSink for Vec<AgentChunk> {
    fn emit(&mut self, chunk: &AgentChunk) -> Result<()> {
        self.push(chunk.clone());
        Ok(())
    }
}

/// Writes each chunk followed by [`TRANSCRIPT_DELIMITER`].
pub struct TranscriptWriter<W> {
    out: W,
}

impl<W: Write + Send> TranscriptWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> ChunkSink for TranscriptWriter<W> {
    fn emit(&mut self, chunk: &AgentChunk) -> Result<()> {
        writeln!(self.out, "{}", chunk.content())?;
        writeln!(self.out, "{}", TRANSCRIPT_DELIMITER)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Turns kept per thread before the oldest are dropped.
pub const DEFAULT_MAX_TURNS: usize = 20;

/// Per-thread conversation history, bounded to the most recent turns.
///
/// Whole turns are evicted so a tool call never loses its result.
#[derive(Debug)]
pub struct ThreadMemory {
    threads: Mutex<HashMap<String, Vec<Vec<ChatMessage>>>>,
    max_turns: usize,
}

impl Default for ThreadMemory {
    fn default() -> Self {
        Self::with_max_turns(DEFAULT_MAX_TURNS)
    }
}

impl ThreadMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_turns(max_turns: usize) -> Self {
        Self {
            threads: Mutex::new(HashMap::new()),
            max_turns: max_turns.max(1),
        }
    }

    pub fn history(&self, thread_id: &str) -> Vec<ChatMessage> {
        let threads = self.threads.lock().unwrap_or_else(|e| e.into_inner());
        threads
            .get(thread_id)
            .map(|turns| turns.iter().flatten().cloned().collect())
            .unwrap_or_default()
    }

    fn append(&self, thread_id: &str, turn: Vec<ChatMessage>) {
        let mut threads = self.threads.lock().unwrap_or_else(|e| e.into_inner());
        let turns = threads.entry(thread_id.to_string()).or_default();
        turns.push(turn);
        if turns.len() > self.max_turns {
            let excess = turns.len() - self.max_turns;
            turns.drain(..excess);
            debug!("Dropped {} old turns from thread {}", excess, thread_id);
        }
    }

    pub fn clear(&self, thread_id: &str) {
        let mut threads = self.threads.lock().unwrap_or_else(|e| e.into_inner());
        threads.remove(thread_id);
    }
}

/// What happened during one turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnSummary {
    /// Model requests made.
    pub steps: usize,
    pub tool_calls: usize,
    /// Last non-empty text from the model.
    pub final_response: Option<String>,
    pub hit_step_limit: bool,
}

pub struct ReactAgent {
    model: Arc<dyn ChatModel>,
    tools: Arc<ToolRegistry>,
    system_prompt: String,
    memory: ThreadMemory,
    thread_id: String,
    max_steps: usize,
}

impl ReactAgent {
    pub fn new(model: Arc<dyn ChatModel>, tools: Arc<ToolRegistry>, system_prompt: impl Into<String>) -> Self {
        Self {
            model,
            tools,
            system_prompt: system_prompt.into(),
            memory: ThreadMemory::new(),
            thread_id: DEFAULT_THREAD_ID.to_string(),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = thread_id.into();
        self
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.memory = ThreadMemory::with_max_turns(max_turns);
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn memory(&self) -> &ThreadMemory {
        &self.memory
    }

    /// Run one turn on the default thread.
    pub async fn stream(&self, input: &str, sink: &mut dyn ChunkSink) -> Result<TurnSummary> {
        self.stream_on(&self.thread_id, input, sink).await
    }

    /// Run one turn on `thread_id`, emitting chunks as they are produced.
    ///
    /// Tool failures are handed back to the model as text. A model failure
    /// aborts the turn and leaves the thread history unchanged.
    pub async fn stream_on(
        &self,
        thread_id: &str,
        input: &str,
        sink: &mut dyn ChunkSink,
    ) -> Result<TurnSummary> {
        let prior = self.memory.history(thread_id);
        let specs = self.tools.specs();
        let mut turn = vec![ChatMessage::user(input)];
        let mut summary = TurnSummary::default();

        while summary.steps < self.max_steps {
            summary.steps += 1;

            let mut request = Vec::with_capacity(prior.len() + turn.len() + 1);
            request.push(ChatMessage::system(self.system_prompt.clone()));
            request.extend(prior.iter().cloned());
            request.extend(turn.iter().cloned());

            let reply = self.model.complete(&request, &specs).await?;
            debug!(
                "Step {}: {} chars, {} tool calls",
                summary.steps,
                reply.content.len(),
                reply.tool_calls.len()
            );

            turn.push(ChatMessage::assistant(reply.content.clone(), reply.tool_calls.clone()));

            if !reply.content.trim().is_empty() {
                sink.emit(&AgentChunk::Agent(reply.content.clone()))?;
                summary.final_response = Some(reply.content);
            }

            if reply.tool_calls.is_empty() {
                self.memory.append(thread_id, turn);
                return Ok(summary);
            }

            for call in reply.tool_calls {
                summary.tool_calls += 1;
                let output = match self.tools.invoke(&call.name, &call.arguments).await {
                    Ok(output) => output,
                    Err(e) => {
                        warn!("Tool {} failed: {}", call.name, e);
                        format!("Error: {}", e)
                    }
                };
                sink.emit(&AgentChunk::Tools {
                    name: call.name.clone(),
                    content: output.clone(),
                })?;
                turn.push(ChatMessage::tool(call.id, output));
            }
        }

        warn!("Turn stopped after {} steps", self.max_steps);
        summary.hit_step_limit = true;
        self.memory.append(thread_id, turn);
        Ok(summary)
    }
}

/// Prompt used to ask the agent to evaluate a single review.
pub fn review_prompt(review: &str) -> String {
    format!("The review is: {}", review)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_writer_format() {
        let mut writer = TranscriptWriter::new(Vec::new());
        writer.emit(&AgentChunk::Agent("hello".into())).unwrap();
        writer
            .emit(&AgentChunk::Tools {
                name: "calculate_incentive".into(),
                content: "{}".into(),
            })
            .unwrap();
        let out = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(out, "hello\n-------------------\n{}\n-------------------\n");
    }

    #[test]
    fn test_review_prompt() {
        assert_eq!(review_prompt("Great app"), "The review is: Great app");
    }

    #[test]
    fn test_thread_memory_isolated() {
        let memory = ThreadMemory::new();
        memory.append("a", vec![ChatMessage::user("one")]);
        assert_eq!(memory.history("a").len(), 1);
        assert!(memory.history("b").is_empty());
        memory.clear("a");
        assert!(memory.history("a").is_empty());
    }

    #[test]
    fn test_thread_memory_drops_oldest_turns() {
        let memory = ThreadMemory::with_max_turns(2);
        for i in 0..5 {
            memory.append(
                "auto",
                vec![ChatMessage::user(format!("q{}", i)), ChatMessage::assistant(format!("a{}", i), Vec::new())],
            );
        }
        let history = memory.history("auto");
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].content, "q3");
        assert_eq!(history[3].content, "a4");
    }
}
