//! Tool abstraction: named, described, schema-validated callables.
//!
//! A tool presents a uniform calling convention over one external query
//! capability (semantic search, SQL execution, image generation) so that
//! an orchestrating agent can select and invoke it by name.

mod image;
mod registry;
mod retriever;
mod schema;
mod sql;

pub use image::ImageTool;
pub use registry::ToolRegistry;
pub use retriever::{RetrieverTool, DOCUMENT_SEPARATOR, NO_DOCUMENTS_MESSAGE};
pub use schema::{ArgValue, InputSchema, ParamSpec, ParamType, ToolArgs};
pub use sql::SqlTool;

use crate::error::Result;
use async_trait::async_trait;

/// Shape of a tool's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    /// Plain text consumable by a language model.
    Text,
    /// An image artifact.
    Image,
}

/// A generated image artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    /// URL of the generated image, if the endpoint returned one.
    pub url: Option<String>,
    /// Base64-encoded payload, if the endpoint returned one.
    pub b64_json: Option<String>,
    /// Prompt as rewritten by the endpoint, if any.
    pub revised_prompt: Option<String>,
}

/// Result of a tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Text(String),
    Image(GeneratedImage),
}

impl ToolOutput {
    /// Render the output as text for an orchestrator transcript.
    pub fn render(&self) -> String {
        match self {
            ToolOutput::Text(text) => text.clone(),
            ToolOutput::Image(image) => match (&image.url, &image.b64_json) {
                (Some(url), _) => format!("Generated image: {}", url),
                (None, Some(_)) => "Generated image (base64 payload)".to_string(),
                (None, None) => "Generated image".to_string(),
            },
        }
    }
}

/// A named, described, typed callable exposing one external capability.
///
/// An invocation must be a pure function of its validated arguments and the
/// wrapped external resource; the tool layer itself holds no mutable state
/// across calls. External failures propagate unmodified, with no retry.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Short identifier, unique within a registry.
    fn name(&self) -> &str;

    /// Natural-language description consumed by the orchestrating model.
    fn description(&self) -> &str;

    /// Declared input parameters.
    fn schema(&self) -> &InputSchema;

    /// Shape of the result.
    fn output_type(&self) -> OutputType {
        OutputType::Text
    }

    /// Execute the tool with validated arguments.
    async fn invoke(&self, args: ToolArgs) -> Result<ToolOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text_output() {
        let output = ToolOutput::Text("hello".to_string());
        assert_eq!(output.render(), "hello");
    }

    #[test]
    fn test_render_image_output() {
        let output = ToolOutput::Image(GeneratedImage {
            url: Some("https://example.com/img.png".to_string()),
            b64_json: None,
            revised_prompt: None,
        });
        assert_eq!(output.render(), "Generated image: https://example.com/img.png");
    }
}
