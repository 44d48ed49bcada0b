//! Registry mapping tool names to implementations.
//!
//! The orchestrator discovers tools through `definitions()` and invokes
//! them through `invoke()`, which validates arguments against the named
//! tool's schema before execution.

use super::{Tool, ToolOutput};
use crate::error::{Result, VerktoyError};
use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Set of tools offered to one agent invocation.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool. Names must be unique within the registry.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> Result<()> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(VerktoyError::InvalidArgument(format!(
                "duplicate tool name '{}'",
                name
            )));
        }
        self.tools.insert(name, Arc::new(tool));
        Ok(())
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Names of all registered tools.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|k| k.as_str()).collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry has no tools.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Render all tools as OpenAI function-calling definitions.
    pub fn definitions(&self) -> Vec<ChatCompletionTool> {
        self.tools
            .values()
            .map(|tool| ChatCompletionTool {
                r#type: ChatCompletionToolType::Function,
                function: FunctionObject {
                    name: tool.name().to_string(),
                    description: Some(tool.description().to_string()),
                    parameters: Some(tool.schema().to_json_schema()),
                    strict: None,
                },
            })
            .collect()
    }

    /// Validate raw JSON arguments against the named tool's schema, then invoke.
    pub async fn invoke(&self, name: &str, raw_args: &serde_json::Value) -> Result<ToolOutput> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| VerktoyError::UnknownTool(name.to_string()))?;

        let args = tool.schema().validate(raw_args)?;
        debug!("Invoking tool {}", name);
        tool.invoke(args).await
    }

    /// Parse a JSON argument string (as delivered by the chat API) and invoke.
    pub async fn invoke_raw(&self, name: &str, arguments: &str) -> Result<ToolOutput> {
        let trimmed = arguments.trim();
        let raw: serde_json::Value = if trimmed.is_empty() {
            serde_json::json!({})
        } else {
            serde_json::from_str(trimmed)
                .map_err(|e| VerktoyError::InvalidArgument(format!("invalid tool arguments: {}", e)))?
        };
        self.invoke(name, &raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::{InputSchema, ParamType, ToolArgs};
    use async_trait::async_trait;
    use serde_json::json;

    struct EchoTool {
        schema: InputSchema,
    }

    impl EchoTool {
        fn new() -> Self {
            Self {
                schema: InputSchema::new().required(
                    "text",
                    ParamType::String,
                    "Text to echo back",
                ),
            }
        }
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes its input back."
        }

        fn schema(&self) -> &InputSchema {
            &self.schema
        }

        async fn invoke(&self, args: ToolArgs) -> Result<ToolOutput> {
            Ok(ToolOutput::Text(args.str("text")?.to_string()))
        }
    }

    #[tokio::test]
    async fn test_register_and_invoke() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool::new()).unwrap();

        let output = registry.invoke("echo", &json!({"text": "hi"})).await.unwrap();
        assert_eq!(output.render(), "hi");
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool::new()).unwrap();
        assert!(registry.register(EchoTool::new()).is_err());
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_tool_rejected() {
        let registry = ToolRegistry::new();
        let err = registry.invoke("nope", &json!({})).await.unwrap_err();
        assert!(matches!(err, VerktoyError::UnknownTool(_)));
    }

    #[tokio::test]
    async fn test_invoke_raw_parses_arguments() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool::new()).unwrap();

        let output = registry.invoke_raw("echo", r#"{"text": "raw"}"#).await.unwrap();
        assert_eq!(output.render(), "raw");

        let err = registry.invoke_raw("echo", "not json").await.unwrap_err();
        assert!(matches!(err, VerktoyError::InvalidArgument(_)));
    }

    #[test]
    fn test_definitions_carry_schema() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool::new()).unwrap();

        let definitions = registry.definitions();
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].function.name, "echo");
        assert_eq!(
            definitions[0].function.description.as_deref(),
            Some("Echoes its input back.")
        );

        let parameters = definitions[0].function.parameters.as_ref().unwrap();
        assert_eq!(parameters["required"], json!(["text"]));
    }
}
