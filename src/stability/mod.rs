pub mod form;
pub mod transport;

use crate::{
    config::GatewayConfig,
    error::{GatewayError, Result},
    logger,
    models::{GenerationRequest, ImageBytes, StabilityResponse},
    session::Session,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;
use uuid::Uuid;

pub use form::{build_form, FormField, FormPayload};
pub use transport::{OutboundRequest, ReqwestTransport, Transport, TransportResponse};

#[derive(Clone)]
pub struct StabilityClient {
    config: GatewayConfig,
    transport: Arc<dyn Transport>,
}

impl StabilityClient {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(config: GatewayConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Convenience entry point: an image switches the call to image-to-image.
    pub async fn generate_image(
        &self,
        prompt: &str,
        credential: &str,
        source_image: Option<ImageBytes>,
    ) -> Result<ImageBytes> {
        let session = Session::new(credential);
        self.generate(&session, GenerationRequest::new(prompt, source_image))
            .await
    }

    pub async fn generate(
        &self,
        session: &Session,
        request: GenerationRequest,
    ) -> Result<ImageBytes> {
        let credential = session.require_credential()?;
        let request_id = Uuid::new_v4();
        let mode = request.mode().path_segment();
        let _timer = logger::timer(&format!("{} [{}]", mode, request_id));

        let outbound = OutboundRequest {
            url: self.config.endpoint(request.mode()),
            headers: vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("Authorization".to_string(), credential.bearer()),
            ],
            form: build_form(&request).await?,
        };

        log::info!(
            "[{}] POST {} ({} form fields)",
            request_id,
            outbound.url,
            outbound.form.fields.len()
        );

        let response = self.transport.post_multipart(outbound).await?;
        log::debug!("[{}] Response status: {}", request_id, response.status);

        decode_response(response)
    }
}

/// Turn a raw API response into image bytes or an error carrying the body verbatim.
pub fn decode_response(response: TransportResponse) -> Result<ImageBytes> {
    if response.status != 200 {
        log::error!(
            "Stability API error ({}): {}",
            response.status,
            response.body
        );
        return Err(GatewayError::ApiError {
            status: response.status,
            body: response.body,
        });
    }

    let parsed: StabilityResponse = serde_json::from_str(&response.body)
        .map_err(|e| GatewayError::ResponseError(format!("Invalid JSON body: {}", e)))?;

    let artifact = parsed
        .artifacts
        .first()
        .ok_or_else(|| GatewayError::ResponseError("No artifacts in response".into()))?;

    if !artifact.is_success() {
        log::warn!(
            "Artifact finished with reason {:?}",
            artifact.finish_reason
        );
    }

    let bytes = STANDARD
        .decode(artifact.base64.trim())
        .map_err(|e| GatewayError::ResponseError(format!("Invalid base64 artifact: {}", e)))?;

    Ok(ImageBytes::new(bytes))
}
