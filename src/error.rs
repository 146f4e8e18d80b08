use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Missing API key: enter your Stability AI API key")]
    MissingCredential,

    #[error("Transport failure: {0}")]
    TransportFailure(String),

    #[error("API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("Response error: {0}")]
    ResponseError(String),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("Image processing task failed: {0}")]
    TaskFailure(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl GatewayError {
    /// HTTP status of an API rejection, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<image::ImageError> for GatewayError {
    fn from(e: image::ImageError) -> Self {
        GatewayError::ImageError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_is_verbatim() {
        let err = GatewayError::ApiError {
            status: 403,
            body: "invalid api key".to_string(),
        };
        assert_eq!(err.to_string(), "API error (403): invalid api key");
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn test_missing_credential_has_fixed_message() {
        let err = GatewayError::MissingCredential;
        assert!(err.to_string().contains("Missing API key"));
        assert_eq!(err.status(), None);
    }
}
