//! Google Gemini `generateContent` protocol conversion.
//!
//! # Example Gemini Request
//! ```json
//! {
//!   "contents": [
//!     {
//!       "role": "user",
//!       "parts": [
//!         {"text": "Analyze the video..."},
//!         {"inlineData": {"mimeType": "video/mp4", "data": "AAAA..."}}
//!       ]
//!     }
//!   ],
//!   "generationConfig": {
//!     "responseMimeType": "application/json",
//!     "responseSchema": {"type": "OBJECT", "properties": {...}}
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::{FromProvider, ProtocolResult, ToProvider};
use crate::provider::{GenerationRequest, GenerationResponse};

const JSON_MIME_TYPE: &str = "application/json";

// ============================================================================
// Gemini API Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiContent {
    /// "user" or "model"
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<GeminiInlineData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiInlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    pub response_mime_type: String,
    pub response_schema: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    /// Absent when the prompt was blocked.
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

// ============================================================================
// Internal → Gemini (ToProvider)
// ============================================================================

impl ToProvider<GeminiRequest> for GenerationRequest {
    fn to_provider(&self) -> ProtocolResult<GeminiRequest> {
        let mut parts = vec![GeminiPart {
            text: Some(self.prompt.clone()),
            inline_data: None,
        }];

        if let Some(media) = &self.media {
            let uri = media.data_uri()?;
            parts.push(GeminiPart {
                text: None,
                inline_data: Some(GeminiInlineData {
                    mime_type: uri.mime_type.to_string(),
                    data: uri.data.to_string(),
                }),
            });
        }

        let generation_config = self
            .output_schema
            .as_ref()
            .map(|schema| GeminiGenerationConfig {
                response_mime_type: JSON_MIME_TYPE.to_string(),
                response_schema: schema.clone(),
            });

        Ok(GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts,
            }],
            generation_config,
        })
    }
}

// ============================================================================
// Gemini → Internal (FromProvider)
// ============================================================================

impl FromProvider<GeminiResponse> for GenerationResponse {
    fn from_provider(response: GeminiResponse) -> ProtocolResult<Self> {
        let Some(candidate) = response.candidates.into_iter().next() else {
            return Ok(GenerationResponse::empty());
        };

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        Ok(GenerationResponse {
            text: if text.is_empty() { None } else { Some(text) },
            output: None,
            finish_reason: candidate.finish_reason,
        })
    }
}
