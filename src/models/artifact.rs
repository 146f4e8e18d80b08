use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilityResponse {
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub base64: String,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(rename = "finishReason", default)]
    pub finish_reason: Option<String>,
}

impl Artifact {
    pub fn is_success(&self) -> bool {
        self.finish_reason
            .as_deref()
            .map_or(true, |reason| reason == "SUCCESS")
    }
}
