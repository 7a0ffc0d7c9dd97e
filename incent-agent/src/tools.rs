//! Tool adapter layer.
//!
//! A [`Tool`] is a named operation the chat model may call. The registry
//! checks every tool when it is registered (name shape, description,
//! argument schema), so a malformed tool is a startup error rather than a
//! surprise in the middle of a conversation.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Tool registration and invocation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("Invalid tool definition '{name}': {reason}")]
    InvalidDefinition { name: String, reason: String },

    #[error("Tool '{0}' is already registered")]
    Duplicate(String),

    #[error("Unknown tool '{0}'")]
    Unknown(String),

    #[error("Invalid arguments for '{name}': {reason}")]
    InvalidArguments { name: String, reason: String },

    #[error("Tool '{name}' failed: {reason}")]
    Execution { name: String, reason: String },
}

impl ToolError {
    pub fn execution(name: &str, reason: impl ToString) -> Self {
        Self::Execution {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// What the model sees about a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON Schema for the arguments object.
    pub parameters: Value,
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn spec(&self) -> ToolSpec;

    /// Run the tool on already-validated arguments.
    async fn call(&self, args: &Value) -> Result<String, ToolError>;
}

struct RegisteredTool {
    spec: ToolSpec,
    schema: JSONSchema,
    handler: Arc<dyn Tool>,
}

/// Name-keyed set of validated tools.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and add a tool.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> Result<(), ToolError> {
        self.register_arc(Arc::new(tool))
    }

    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let spec = tool.spec();
        let invalid = |reason: &str| ToolError::InvalidDefinition {
            name: spec.name.clone(),
            reason: reason.to_string(),
        };

        if !is_snake_case(&spec.name) {
            return Err(invalid("name must be non-empty snake_case"));
        }
        if self.tools.contains_key(&spec.name) {
            return Err(ToolError::Duplicate(spec.name.clone()));
        }
        if spec.description.trim().is_empty() {
            return Err(invalid("description is empty"));
        }
        if spec.parameters.get("type").and_then(Value::as_str) != Some("object") {
            return Err(invalid("parameters must be an object schema"));
        }
        let schema = JSONSchema::compile(&spec.parameters)
            .map_err(|e| invalid(&format!("schema does not compile: {}", e)))?;

        debug!("Registered tool {}", spec.name);
        self.tools.insert(
            spec.name.clone(),
            RegisteredTool {
                spec,
                schema,
                handler: tool,
            },
        );
        Ok(())
    }

    /// Specs of every registered tool, sorted by name.
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|t| t.spec.clone()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Check arguments against the tool's schema, then run it.
    pub async fn invoke(&self, name: &str, args: &Value) -> Result<String, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::Unknown(name.to_string()))?;

        if let Err(errors) = tool.schema.validate(args) {
            let messages: Vec<String> = errors.map(|e| e.to_string()).collect();
            return Err(ToolError::InvalidArguments {
                name: name.to_string(),
                reason: messages.join("; "),
            });
        }

        tool.handler.call(args).await
    }
}

fn is_snake_case(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && !name.ends_with('_')
        && !name.contains("__")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo {
        name: &'static str,
        description: &'static str,
        parameters: Value,
    }

    impl Echo {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                description: "Echo the text back",
                parameters: json!({
                    "type": "object",
                    "properties": { "text": { "type": "string" } },
                    "required": ["text"]
                }),
            }
        }
    }

    #[async_trait]
    impl Tool for Echo {
        fn spec(&self) -> ToolSpec {
            ToolSpec {
                name: self.name.to_string(),
                description: self.description.to_string(),
                parameters: self.parameters.clone(),
            }
        }

        async fn call(&self, args: &Value) -> Result<String, ToolError> {
            Ok(args["text"].as_str().unwrap_or_default().to_string())
        }
    }

    #[test]
    fn test_snake_case() {
        assert!(is_snake_case("check_review_helpfulness"));
        assert!(is_snake_case("tool2"));
        assert!(!is_snake_case(""));
        assert!(!is_snake_case("CheckReview"));
        assert!(!is_snake_case("check-review"));
        assert!(!is_snake_case("_private"));
        assert!(!is_snake_case("double__underscore"));
    }

    #[test]
    fn test_register_rejects_bad_definitions() {
        let mut registry = ToolRegistry::new();
        assert!(matches!(
            registry.register(Echo::new("Bad Name")),
            Err(ToolError::InvalidDefinition { .. })
        ));

        let mut blank = Echo::new("echo");
        blank.description = "  ";
        assert!(registry.register(blank).is_err());

        let mut not_object = Echo::new("echo");
        not_object.parameters = json!({"type": "string"});
        assert!(registry.register(not_object).is_err());

        let mut broken = Echo::new("echo");
        broken.parameters = json!({"type": "object", "properties": {"text": {"type": 12}}});
        assert!(registry.register(broken).is_err());

        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(Echo::new("echo")).unwrap();
        assert_eq!(
            registry.register(Echo::new("echo")),
            Err(ToolError::Duplicate("echo".to_string()))
        );
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_invoke_validates_arguments() {
        let mut registry = ToolRegistry::new();
        registry.register(Echo::new("echo")).unwrap();

        assert_eq!(registry.invoke("echo", &json!({"text": "hi"})).await.unwrap(), "hi");
        assert!(matches!(
            registry.invoke("echo", &json!({})).await,
            Err(ToolError::InvalidArguments { .. })
        ));
        assert_eq!(
            registry.invoke("missing", &json!({})).await,
            Err(ToolError::Unknown("missing".to_string()))
        );
    }
}
