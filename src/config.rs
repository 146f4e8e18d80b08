use crate::{
    error::{GatewayError, Result},
    models::GenerationMode,
};
use std::env;

pub const DEFAULT_API_HOST: &str = "https://api.stability.ai";
pub const DEFAULT_ENGINE_ID: &str = "stable-diffusion-xl-1024-v1-0";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_host: Option<String>,
    pub engine_id: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            api_host: None,
            engine_id: None,
        }
    }
}

impl GatewayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_host = env::var("STABILITY_API_HOST").ok();
        let engine_id = env::var("STABILITY_ENGINE_ID").ok();

        GatewayConfig {
            api_host,
            engine_id,
        }
    }

    pub fn with_api_host(mut self, api_host: impl Into<String>) -> Self {
        self.api_host = Some(api_host.into());
        self
    }

    pub fn with_engine_id(mut self, engine_id: impl Into<String>) -> Self {
        self.engine_id = Some(engine_id.into());
        self
    }

    pub fn api_host(&self) -> &str {
        self.api_host
            .as_deref()
            .unwrap_or(DEFAULT_API_HOST)
            .trim_end_matches('/')
    }

    pub fn engine_id(&self) -> &str {
        self.engine_id.as_deref().unwrap_or(DEFAULT_ENGINE_ID)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_host().is_empty() {
            return Err(GatewayError::ConfigError("API host is empty".into()));
        }
        if self.engine_id().trim().is_empty() {
            return Err(GatewayError::ConfigError("Engine id is empty".into()));
        }
        Ok(())
    }

    /// Full endpoint URL for the given mode.
    pub fn endpoint(&self, mode: &GenerationMode) -> String {
        format!(
            "{}/v1/generation/{}/{}",
            self.api_host(),
            self.engine_id(),
            mode.path_segment()
        )
    }
}
