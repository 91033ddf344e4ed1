//! Google Gemini provider implementation.

use async_trait::async_trait;
use reqwest::Client;

use crate::protocol::gemini::{GeminiRequest, GeminiResponse};
use crate::protocol::{parse_structured_output, FromProvider, ToProvider};
use crate::provider::{
    GenerationProvider, GenerationRequest, GenerationResponse, ModelInvocationError, Result,
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Google Gemini API provider.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Set a custom base URL (e.g., for proxies or alternative endpoints).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model name (e.g., "gemini-2.0-flash", "gemini-1.5-pro").
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Use a preconfigured HTTP client (proxy settings, timeouts).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

/// Transport errors are logged upstream; they never carry the request URL.
fn transport_error(error: reqwest::Error) -> ModelInvocationError {
    ModelInvocationError::Http(error.without_url())
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        let wants_structured = request.output_schema.is_some();
        let body: GeminiRequest = request.to_provider()?;

        log::debug!(
            "Gemini request: model={}, prompt_chars={}, media={}, structured={}",
            self.model,
            request.prompt.len(),
            request.media.is_some(),
            wants_structured
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.map_err(transport_error)?;

            if status == 401 || status == 403 {
                return Err(ModelInvocationError::Auth(format!(
                    "Gemini authentication failed: {}. Please check your API key.",
                    text
                )));
            }

            return Err(ModelInvocationError::Api(format!(
                "Gemini API error: HTTP {}: {}",
                status, text
            )));
        }

        let raw: GeminiResponse = response.json().await.map_err(transport_error)?;
        let mut generated = GenerationResponse::from_provider(raw)?;

        if wants_structured {
            generated.output = match generated.text.as_deref() {
                Some(text) => match parse_structured_output(text) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        log::warn!("Gemini returned text that is not structured output: {}", e);
                        None
                    }
                },
                None => None,
            };
        }

        log::debug!(
            "Gemini response: finish_reason={:?}, has_text={}, has_output={}",
            generated.finish_reason,
            generated.text.is_some(),
            generated.output.is_some()
        );

        Ok(generated)
    }
}
