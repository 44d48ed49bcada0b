//! Image generation tool.

use super::schema::{InputSchema, ParamType, ToolArgs};
use super::{GeneratedImage, OutputType, Tool, ToolOutput};
use crate::error::{Result, VerktoyError};
use crate::openai::create_client;
use async_openai::types::{
    CreateImageRequestArgs, Image, ImageModel, ImageResponseFormat, ImageSize,
};
use async_trait::async_trait;
use tracing::debug;

/// Tool that generates an image from a text prompt.
pub struct ImageTool {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    size: String,
    schema: InputSchema,
}

impl ImageTool {
    /// Create an image tool for the given model and size (e.g., "1024x1024").
    pub fn new(model: &str, size: &str) -> Self {
        let schema = InputSchema::new().required(
            "prompt",
            ParamType::String,
            "Text description of the image to generate.",
        );

        Self {
            client: create_client(),
            model: model.to_string(),
            size: size.to_string(),
            schema,
        }
    }
}

fn parse_model(model: &str) -> ImageModel {
    match model {
        "dall-e-2" => ImageModel::DallE2,
        "dall-e-3" => ImageModel::DallE3,
        other => ImageModel::Other(other.to_string()),
    }
}

fn parse_size(size: &str) -> ImageSize {
    match size {
        "256x256" => ImageSize::S256x256,
        "512x512" => ImageSize::S512x512,
        "1792x1024" => ImageSize::S1792x1024,
        "1024x1792" => ImageSize::S1024x1792,
        _ => ImageSize::S1024x1024,
    }
}

#[async_trait]
impl Tool for ImageTool {
    fn name(&self) -> &str {
        "image_generator"
    }

    fn description(&self) -> &str {
        "Generates an image from a text prompt and returns the image artifact."
    }

    fn schema(&self) -> &InputSchema {
        &self.schema
    }

    fn output_type(&self) -> OutputType {
        OutputType::Image
    }

    async fn invoke(&self, args: ToolArgs) -> Result<ToolOutput> {
        let prompt = args.str("prompt")?;

        let request = CreateImageRequestArgs::default()
            .prompt(prompt)
            .model(parse_model(&self.model))
            .size(parse_size(&self.size))
            .response_format(ImageResponseFormat::Url)
            .n(1)
            .build()
            .map_err(|e| VerktoyError::OpenAI(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .images()
            .create(request)
            .await
            .map_err(|e| VerktoyError::OpenAI(format!("Image API error: {}", e)))?;

        let image = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| VerktoyError::OpenAI("Empty image response".to_string()))?;

        debug!("Generated one image with model {}", self.model);

        let generated = match image.as_ref() {
            Image::Url { url, revised_prompt } => GeneratedImage {
                url: Some(url.clone()),
                b64_json: None,
                revised_prompt: revised_prompt.clone(),
            },
            Image::B64Json {
                b64_json,
                revised_prompt,
            } => GeneratedImage {
                url: None,
                b64_json: Some(b64_json.as_ref().clone()),
                revised_prompt: revised_prompt.clone(),
            },
        };

        Ok(ToolOutput::Image(generated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_surface() {
        let tool = ImageTool::new("dall-e-3", "1024x1024");
        assert_eq!(tool.name(), "image_generator");
        assert_eq!(tool.output_type(), OutputType::Image);
    }

    #[test]
    fn test_missing_prompt_rejected() {
        let tool = ImageTool::new("dall-e-3", "1024x1024");
        let err = tool.schema().validate(&json!({})).unwrap_err();
        assert!(err.to_string().contains("missing required argument 'prompt'"));
    }

    #[test]
    fn test_non_string_prompt_rejected() {
        let tool = ImageTool::new("dall-e-3", "1024x1024");
        let err = tool.schema().validate(&json!({"prompt": ["a"]})).unwrap_err();
        assert!(err.to_string().contains("'prompt' must be a string"));
    }
}
