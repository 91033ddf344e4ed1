use ehs_llm::protocol::parse_structured_output;
use ehs_llm::GenerationResponse;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{OutputParseError, ParseFailure};
use crate::schema::ObjectSchema;

/// Check a raw model response against the output schema and decode it.
///
/// Structured output is preferred; a text-only reply is accepted when the text parses as
/// JSON. Anything else is an [`OutputParseError`] labelled with `subject`.
pub fn normalize<O: DeserializeOwned>(
    subject: &'static str,
    schema: &ObjectSchema,
    response: &GenerationResponse,
) -> Result<O, OutputParseError> {
    let fail = |reason: ParseFailure| OutputParseError { subject, reason };

    let candidate: Option<Value> = match (&response.output, response.text.as_deref()) {
        (Some(output), _) => Some(output.clone()),
        (None, Some(text)) => parse_structured_output(text).ok(),
        (None, None) => None,
    };

    let Some(candidate) = candidate else {
        return Err(fail(ParseFailure::NoOutput));
    };

    let normalized = schema
        .validate_value(&candidate)
        .map_err(|e| fail(ParseFailure::SchemaMismatch(e)))?;

    serde_json::from_value(Value::Object(normalized)).map_err(|e| fail(ParseFailure::Malformed(e)))
}
