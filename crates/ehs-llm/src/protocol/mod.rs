//! Conversion between the provider-neutral request/response types and each service's
//! wire format.
//!
//! ```text
//! Provider Types (Gemini, ...)
//!     ↕
//! GenerationRequest / GenerationResponse
//! ```

mod errors;
pub mod gemini;

pub use errors::{ProtocolError, ProtocolResult};

use serde_json::Value;

/// "spoke → hub": provider wire type into the neutral type.
pub trait FromProvider<T>: Sized {
    fn from_provider(value: T) -> ProtocolResult<Self>;
}

/// "hub → spoke": neutral type into the provider wire type.
pub trait ToProvider<T>: Sized {
    fn to_provider(&self) -> ProtocolResult<T>;
}

/// Parse a completion as structured JSON output.
///
/// Models sometimes wrap JSON in a markdown fence even in JSON mode; the fence is
/// stripped before parsing.
pub fn parse_structured_output(text: &str) -> ProtocolResult<Value> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    if body.is_empty() {
        return Err(ProtocolError::MissingField("text".to_string()));
    }

    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_structured_output_strips_fence() {
        let value = parse_structured_output("```json\n{\"riskLevel\": \"High\"}\n```").unwrap();
        assert_eq!(value, json!({"riskLevel": "High"}));

        let bare = parse_structured_output("  {\"ok\": true} ").unwrap();
        assert_eq!(bare, json!({"ok": true}));
    }

    #[test]
    fn test_parse_structured_output_rejects_prose() {
        assert!(matches!(
            parse_structured_output("not json"),
            Err(ProtocolError::Serialization(_))
        ));
        assert!(matches!(
            parse_structured_output("   "),
            Err(ProtocolError::MissingField(_))
        ));
    }
}
