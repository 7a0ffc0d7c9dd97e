use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use incent_agent::{
    AgentConfig, AgentError, AssistantTurn, ChatMessage, ChatModel, Result, ToolCall, ToolSpec,
};
use serde_json::Value;
use tempfile::TempDir;

/// A chat model that replays canned turns and records every request.
#[derive(Default)]
pub struct ScriptedModel {
    turns: Mutex<VecDeque<AssistantTurn>>,
    pub requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedModel {
    pub fn new(turns: Vec<AssistantTurn>) -> Arc<Self> {
        Arc::new(Self {
            turns: Mutex::new(turns.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, messages: &[ChatMessage], _tools: &[ToolSpec]) -> Result<AssistantTurn> {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.turns
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AgentError::Llm("503 Service Unavailable".to_string()))
    }
}

pub fn say(text: &str) -> AssistantTurn {
    AssistantTurn {
        content: text.to_string(),
        tool_calls: Vec::new(),
    }
}

pub fn call(id: &str, name: &str, arguments: Value) -> AssistantTurn {
    AssistantTurn {
        content: String::new(),
        tool_calls: vec![ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            arguments,
        }],
    }
}

/// Config with all required variables set and the wallet file inside `dir`.
pub fn test_config(dir: &TempDir, llm_base_url: &str) -> AgentConfig {
    let vars: HashMap<&str, String> = HashMap::from([
        ("XAI_API_KEY", "xai-test-key".to_string()),
        ("CDP_API_KEY_NAME", "organizations/test/apiKeys/test".to_string()),
        ("CDP_API_KEY_PRIVATE_KEY", "test-private-key".to_string()),
        ("XAI_BASE_URL", llm_base_url.to_string()),
        (
            "WALLET_DATA_FILE",
            dir.path().join("wallet_data.txt").display().to_string(),
        ),
    ]);
    AgentConfig::from_lookup(|name| vars.get(name).cloned()).unwrap()
}
