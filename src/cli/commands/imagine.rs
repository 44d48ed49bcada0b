//! Imagine command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::tool::{ImageTool, Tool, ToolOutput};
use anyhow::Result;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Run the imagine command.
pub async fn run_imagine(prompt: &str, output: Option<PathBuf>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Imagine) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let tool = ImageTool::new(&settings.images.model, &settings.images.size);
    let args = tool.schema().validate(&json!({ "prompt": prompt }))?;

    let spinner = Output::spinner("Generating image...");
    let result = tool.invoke(args).await;
    spinner.finish_and_clear();

    let image = match result {
        Ok(ToolOutput::Image(image)) => image,
        Ok(other) => {
            Output::warning(&format!("Unexpected tool output: {}", other.render()));
            return Ok(());
        }
        Err(e) => {
            Output::error(&format!("Image generation failed: {}", e));
            return Err(anyhow::anyhow!("{}", e));
        }
    };

    if let Some(revised) = &image.revised_prompt {
        Output::info(&format!("Revised prompt: {}", revised));
    }

    match (&image.url, &image.b64_json) {
        (Some(url), _) => {
            let path = output.unwrap_or_else(|| PathBuf::from("image.png"));
            download(url, &path).await?;
            Output::success(&format!("Saved image to {}", path.display()));
        }
        (None, Some(_)) => {
            Output::warning("Endpoint returned a base64 payload; URL delivery was expected.");
        }
        (None, None) => {
            Output::warning("Endpoint returned no image data.");
        }
    }

    Ok(())
}

/// Download an image artifact to disk.
async fn download(url: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let response = reqwest::get(url).await?.error_for_status()?;
    let bytes = response.bytes().await?;
    std::fs::write(path, &bytes)?;

    Ok(())
}
