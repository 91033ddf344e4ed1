use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::media::MediaPart;

#[derive(Error, Debug)]
pub enum ModelInvocationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Protocol conversion error: {0}")]
    Protocol(#[from] crate::protocol::ProtocolError),
}

pub type Result<T> = std::result::Result<T, ModelInvocationError>;

/// A single prompt submitted to a generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    /// Optional media attachment, passed through as an opaque data URI.
    pub media: Option<MediaPart>,
    /// Shape the service is asked to conform to. Conformance is requested, not enforced.
    pub output_schema: Option<Value>,
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            media: None,
            output_schema: None,
        }
    }

    pub fn with_media(mut self, media: MediaPart) -> Self {
        self.media = Some(media);
        self
    }

    pub fn with_output_schema(mut self, schema: Value) -> Self {
        self.output_schema = Some(schema);
        self
    }
}

/// What came back from the service.
///
/// `text` is the raw completion. `output` is only populated when an output schema was
/// declared and the completion parsed as JSON.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationResponse {
    pub text: Option<String>,
    pub output: Option<Value>,
    pub finish_reason: Option<String>,
}

impl GenerationResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn from_output(output: Value) -> Self {
        Self {
            text: Some(output.to_string()),
            output: Some(output),
            finish_reason: None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Submit one request and wait for the full reply.
    ///
    /// Transport and service failures come back as `Err`; a reply without usable
    /// content is still `Ok` and left to the caller to judge.
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builders() {
        let request = GenerationRequest::text("hello")
            .with_media(MediaPart::new("data:video/mp4;base64,AAAA"))
            .with_output_schema(json!({"type": "OBJECT"}));

        assert_eq!(request.prompt, "hello");
        assert_eq!(
            request.media.as_ref().map(|m| m.url.as_str()),
            Some("data:video/mp4;base64,AAAA")
        );
        assert_eq!(request.output_schema, Some(json!({"type": "OBJECT"})));
    }

    #[test]
    fn test_response_from_output_keeps_text() {
        let response = GenerationResponse::from_output(json!({"analysis": "ok"}));
        assert_eq!(response.text.as_deref(), Some(r#"{"analysis":"ok"}"#));
        assert!(response.output.is_some());
        assert!(GenerationResponse::empty().text.is_none());
    }
}
