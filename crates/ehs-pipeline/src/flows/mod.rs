//! The two model-backed flows and the sequence they share: validate, compose, invoke,
//! normalize.

pub mod rule_builder;
pub mod video_analysis;

use ehs_llm::{GenerationProvider, GenerationRequest, MediaPart};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{PipelineError, ValidationError};
use crate::lifecycle::{ActionStage, Lifecycle};
use crate::normalizer::normalize;
use crate::prompt::PromptBuilder;
use crate::schema::ObjectSchema;

pub(crate) struct FlowDefinition<I: 'static> {
    pub name: &'static str,
    /// Used in the user-facing parse failure, e.g. "Analysis failed to produce an output."
    pub subject: &'static str,
    pub input_schema: &'static ObjectSchema,
    pub output_schema: &'static ObjectSchema,
    pub prompt: fn() -> PromptBuilder<I>,
    pub media: fn(&I) -> Option<MediaPart>,
}

pub(crate) async fn run_flow<I, O>(
    flow: &FlowDefinition<I>,
    provider: &dyn GenerationProvider,
    input: &I,
    lifecycle: &mut Lifecycle,
) -> Result<O, PipelineError>
where
    I: Serialize,
    O: DeserializeOwned,
{
    lifecycle.advance(ActionStage::Validating);
    if let Err(e) = validate_input(flow, input) {
        lifecycle.advance(ActionStage::Failed);
        return Err(e.into());
    }

    let prompt = (flow.prompt)().render(input);
    let mut request =
        GenerationRequest::text(prompt).with_output_schema(flow.output_schema.response_schema());
    if let Some(media) = (flow.media)(input) {
        request = request.with_media(media);
    }

    lifecycle.advance(ActionStage::Invoking);
    log::info!(
        "[{}] invoking model (prompt_chars={}, media={})",
        flow.name,
        request.prompt.len(),
        request.media.is_some()
    );
    let response = match provider.generate(request).await {
        Ok(response) => response,
        Err(e) => {
            lifecycle.advance(ActionStage::Failed);
            return Err(e.into());
        }
    };

    lifecycle.advance(ActionStage::Normalizing);
    match normalize(flow.subject, flow.output_schema, &response) {
        Ok(output) => {
            lifecycle.advance(ActionStage::Succeeded);
            Ok(output)
        }
        Err(e) => {
            log::warn!("[{}] {}: {}", flow.name, e, e.reason);
            lifecycle.advance(ActionStage::Failed);
            Err(e.into())
        }
    }
}

fn validate_input<I: Serialize>(flow: &FlowDefinition<I>, input: &I) -> Result<(), ValidationError> {
    let value = serde_json::to_value(input)
        .map_err(|e| ValidationError::single("(root)", e.to_string()))?;
    flow.input_schema.validate_value(&value).map(|_| ())
}
