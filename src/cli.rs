use crate::{
    error::{GatewayError, Result},
    models::{GenerationRequest, ImageBytes},
    session::Session,
};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

/// Stability AI image generation from the command line
#[derive(Parser, Debug)]
#[command(name = "imagegate")]
#[command(version)]
#[command(about = "Generate or edit images with the Stability AI API", long_about = None)]
pub struct Cli {
    /// Stability AI API key (can also be set via STABILITY_API_KEY env var)
    #[arg(long, env = "STABILITY_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an image from a text prompt
    Generate {
        /// What to draw (English works best)
        #[arg(value_parser = non_empty_prompt)]
        prompt: String,

        /// Where to write the PNG
        output: Option<PathBuf>,
    },

    /// Rework an existing photo according to a prompt
    Edit {
        /// Source image (png, jpg, ...)
        source: PathBuf,

        /// How the image should change
        #[arg(value_parser = non_empty_prompt)]
        prompt: String,

        /// Where to write the PNG
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub fn session(&self) -> Session {
        Session::new(self.api_key.clone())
    }

    /// Reads the source image for `edit`; `generate` needs no I/O.
    pub fn load_request(&self) -> Result<GenerationRequest> {
        match &self.command {
            Command::Generate { prompt, .. } => Ok(GenerationRequest::generate(prompt.clone())),
            Command::Edit { source, prompt, .. } => {
                let bytes = fs::read(source).map_err(|e| {
                    GatewayError::ImageError(format!(
                        "cannot read source image {}: {}",
                        source.display(),
                        e
                    ))
                })?;
                Ok(GenerationRequest::edit(prompt.clone(), ImageBytes::new(bytes)))
            }
        }
    }

    pub fn output_path(&self) -> PathBuf {
        let (output, mode) = match &self.command {
            Command::Generate { output, .. } => (output, "text_to_image"),
            Command::Edit { output, .. } => (output, "image_to_image"),
        };
        output.clone().unwrap_or_else(|| {
            PathBuf::from(format!(
                "generated_{}_{}.png",
                mode,
                chrono::Utc::now().timestamp()
            ))
        })
    }
}

fn non_empty_prompt(value: &str) -> std::result::Result<String, String> {
    if value.trim().is_empty() {
        return Err("prompt must not be empty".to_string());
    }
    Ok(value.to_string())
}
